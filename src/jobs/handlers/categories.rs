// src/jobs/handlers/categories.rs

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState};
use crate::jobs::models::CreateCategoryRequest;
use crate::jobs::services::CategoriesService;

/// GET /api/categories
pub async fn list_categories(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state_lock.read().await.db.clone();
    Ok(Json(CategoriesService::new(db).list().await?))
}

/// POST /api/admin/categories
pub async fn create_category(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;
    let db = state_lock.read().await.db.clone();

    let category = CategoriesService::new(db).create(request).await?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// DELETE /api/admin/categories/:id
pub async fn delete_category(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(category_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;
    let db = state_lock.read().await.db.clone();

    CategoriesService::new(db).delete(&category_id).await?;

    Ok(Json(json!({ "message": "Category deleted" })))
}
