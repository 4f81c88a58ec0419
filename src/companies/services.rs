use super::models::{
    Company, CompanyResponse, CompanyStatus, CreateCompanyRequest, UpdateCompanyRequest,
};
use super::validators::CompanyValidator;
use crate::common::{generate_id, now_timestamp, ApiError, EntityPrefix, Page, Pagination, Validator};
use sqlx::SqlitePool;
use tracing::info;

const COMPANY_COLUMNS: &str =
    "id, owner_id, name, description, website, location, logo, status, created_at, updated_at";

pub const NOT_APPROVED_MESSAGE: &str = "You are not approved to post jobs yet.";

pub struct CompaniesService {
    db: SqlitePool,
}

fn blank_to_none(value: &Option<String>) -> Option<String> {
    value
        .as_ref()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl CompaniesService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn find_by_owner(&self, owner_id: &str) -> Result<Option<Company>, ApiError> {
        let company = sqlx::query_as::<_, Company>(&format!(
            "SELECT {} FROM companies WHERE owner_id = ?",
            COMPANY_COLUMNS
        ))
        .bind(owner_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(company)
    }

    pub async fn get_company_by_id(&self, company_id: &str) -> Result<Company, ApiError> {
        sqlx::query_as::<_, Company>(&format!(
            "SELECT {} FROM companies WHERE id = ?",
            COMPANY_COLUMNS
        ))
        .bind(company_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Company not found".to_string()))
    }

    /// The caller's company, provided an admin has approved it.
    pub async fn require_approved_company(&self, owner_id: &str) -> Result<Company, ApiError> {
        match self.find_by_owner(owner_id).await? {
            Some(company) if company.is_approved() => Ok(company),
            _ => Err(ApiError::Forbidden(NOT_APPROVED_MESSAGE.to_string())),
        }
    }

    /// New companies start out `pending` and cannot post until approved.
    pub async fn create_company(
        &self,
        owner_id: &str,
        request: CreateCompanyRequest,
    ) -> Result<Company, ApiError> {
        CompanyValidator.validate(&request).into_result()?;

        if self.find_by_owner(owner_id).await?.is_some() {
            return Err(ApiError::Conflict(
                "You already have a company profile".to_string(),
            ));
        }

        let company_id = generate_id(EntityPrefix::Company);
        let now = now_timestamp();

        sqlx::query(
            r#"
            INSERT INTO companies (id, owner_id, name, description, website, location, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&company_id)
        .bind(owner_id)
        .bind(request.name.trim())
        .bind(blank_to_none(&request.description))
        .bind(blank_to_none(&request.website))
        .bind(blank_to_none(&request.location))
        .bind(CompanyStatus::Pending.as_str())
        .bind(&now)
        .bind(&now)
        .execute(&self.db)
        .await
        .map_err(|e| ApiError::conflict_on_unique(e, "Company name already exists"))?;

        info!(company_id = %company_id, owner_id = %owner_id, "Created company: {}", request.name.trim());

        self.get_company_by_id(&company_id).await
    }

    /// Only the owning account may edit; moderation status never changes here.
    pub async fn update_company(
        &self,
        company_id: &str,
        owner_id: &str,
        request: UpdateCompanyRequest,
    ) -> Result<Company, ApiError> {
        let company = self.get_company_by_id(company_id).await?;
        if company.owner_id != owner_id {
            return Err(ApiError::Forbidden(
                "You are not allowed to edit this company.".to_string(),
            ));
        }

        CompanyValidator.validate(&request).into_result()?;

        let mut updates: Vec<&str> = Vec::new();
        let mut params: Vec<Option<String>> = Vec::new();

        if let Some(name) = &request.name {
            updates.push("name = ?");
            params.push(Some(name.trim().to_string()));
        }
        if request.description.is_some() {
            updates.push("description = ?");
            params.push(blank_to_none(&request.description));
        }
        if request.website.is_some() {
            updates.push("website = ?");
            params.push(blank_to_none(&request.website));
        }
        if request.location.is_some() {
            updates.push("location = ?");
            params.push(blank_to_none(&request.location));
        }

        if updates.is_empty() {
            return Ok(company);
        }

        updates.push("updated_at = ?");
        params.push(Some(now_timestamp()));

        let query = format!("UPDATE companies SET {} WHERE id = ?", updates.join(", "));
        let mut q = sqlx::query(&query);
        for param in params {
            q = q.bind(param);
        }
        q.bind(company_id)
            .execute(&self.db)
            .await
            .map_err(|e| ApiError::conflict_on_unique(e, "Company name already exists"))?;

        info!(company_id = %company_id, "Company details updated");
        self.get_company_by_id(company_id).await
    }

    /// Stores the new logo file name and returns the previous one.
    pub async fn set_logo(&self, company_id: &str, filename: &str) -> Result<Option<String>, ApiError> {
        let previous: Option<Option<String>> =
            sqlx::query_scalar("SELECT logo FROM companies WHERE id = ?")
                .bind(company_id)
                .fetch_optional(&self.db)
                .await?;
        let previous = previous.ok_or_else(|| ApiError::NotFound("Company not found".to_string()))?;

        sqlx::query("UPDATE companies SET logo = ?, updated_at = ? WHERE id = ?")
            .bind(filename)
            .bind(now_timestamp())
            .bind(company_id)
            .execute(&self.db)
            .await?;
        Ok(previous)
    }

    pub async fn list_approved(&self, pagination: Pagination) -> Result<Page<CompanyResponse>, ApiError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM companies WHERE status = 'approved'")
            .fetch_one(&self.db)
            .await?;

        let companies = sqlx::query_as::<_, Company>(&format!(
            "SELECT {} FROM companies WHERE status = 'approved' ORDER BY name ASC LIMIT ? OFFSET ?",
            COMPANY_COLUMNS
        ))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        let mut items = Vec::with_capacity(companies.len());
        for company in companies {
            items.push(self.to_response(company).await?);
        }
        Ok(Page::new(items, total, pagination))
    }

    pub async fn to_response(&self, company: Company) -> Result<CompanyResponse, ApiError> {
        let active_jobs: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM jobs WHERE company_id = ? AND is_active = 1")
                .bind(&company.id)
                .fetch_one(&self.db)
                .await?;
        let logo_url = company.logo_url();
        Ok(CompanyResponse {
            id: company.id,
            name: company.name,
            description: company.description,
            website: company.website,
            location: company.location,
            logo_url,
            status: company.status,
            active_jobs,
        })
    }

    pub async fn list_all(&self, status: Option<CompanyStatus>) -> Result<Vec<Company>, ApiError> {
        let companies = match status {
            Some(status) => {
                sqlx::query_as::<_, Company>(&format!(
                    "SELECT {} FROM companies WHERE status = ? ORDER BY created_at DESC",
                    COMPANY_COLUMNS
                ))
                .bind(status.as_str())
                .fetch_all(&self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, Company>(&format!(
                    "SELECT {} FROM companies ORDER BY created_at DESC",
                    COMPANY_COLUMNS
                ))
                .fetch_all(&self.db)
                .await?
            }
        };
        Ok(companies)
    }

    pub async fn set_status(&self, company_id: &str, status: CompanyStatus) -> Result<Company, ApiError> {
        let result = sqlx::query("UPDATE companies SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(now_timestamp())
            .bind(company_id)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Company not found".to_string()));
        }

        info!(company_id = %company_id, status = %status.as_str(), "Company moderation status changed");
        self.get_company_by_id(company_id).await
    }

    /// Returns how many of `ids` existed and were updated.
    pub async fn bulk_set_status(&self, ids: &[String], status: CompanyStatus) -> Result<u64, ApiError> {
        let now = now_timestamp();
        let mut tx = self.db.begin().await?;
        let mut updated = 0;
        for id in ids {
            updated += sqlx::query("UPDATE companies SET status = ?, updated_at = ? WHERE id = ?")
                .bind(status.as_str())
                .bind(&now)
                .bind(id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }
        tx.commit().await?;

        info!(requested = ids.len(), updated = updated, status = %status.as_str(), "Bulk company status update");
        Ok(updated)
    }
}
