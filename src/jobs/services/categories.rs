// src/jobs/services/categories.rs

use sqlx::SqlitePool;
use tracing::info;

use crate::common::{generate_id, ApiError, EntityPrefix, Validator};
use crate::jobs::models::{Category, CreateCategoryRequest};
use crate::jobs::slug::slugify;
use crate::jobs::validators::CategoryValidator;

pub struct CategoriesService {
    db: SqlitePool,
}

impl CategoriesService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<Category>, ApiError> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name, slug FROM job_categories ORDER BY name ASC")
                .fetch_all(&self.db)
                .await?;
        Ok(categories)
    }

    pub async fn create(&self, request: CreateCategoryRequest) -> Result<Category, ApiError> {
        CategoryValidator.validate(&request).into_result()?;

        let name = request.name.trim().to_string();
        let slug = request
            .slug
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| slugify(&name));

        let category = Category {
            id: generate_id(EntityPrefix::Category),
            name,
            slug,
        };

        sqlx::query("INSERT INTO job_categories (id, name, slug) VALUES (?, ?, ?)")
            .bind(&category.id)
            .bind(&category.name)
            .bind(&category.slug)
            .execute(&self.db)
            .await
            .map_err(|e| ApiError::conflict_on_unique(e, "Category slug already exists"))?;

        info!(category_id = %category.id, slug = %category.slug, "Category created");
        Ok(category)
    }

    /// Jobs in the category survive with no category.
    pub async fn delete(&self, category_id: &str) -> Result<(), ApiError> {
        let mut tx = self.db.begin().await?;

        sqlx::query("UPDATE jobs SET category_id = NULL WHERE category_id = ?")
            .bind(category_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM job_categories WHERE id = ?")
            .bind(category_id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Category not found".to_string()));
        }

        tx.commit().await?;
        info!(category_id = %category_id, "Category deleted");
        Ok(())
    }
}
