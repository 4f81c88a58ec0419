// src/bookmarks/handlers.rs

use axum::{
    extract::{Extension, Path, Query},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::services::BookmarksService;
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState, PageQuery};

/// POST /api/bookmarks/:job_id/toggle
pub async fn toggle_bookmark(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state_lock.read().await.db.clone();
    let response = BookmarksService::new(db).toggle(&user.id, &job_id).await?;
    Ok(Json(response))
}

/// GET /api/bookmarks
pub async fn list_bookmarks(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state_lock.read().await.db.clone();
    let page = BookmarksService::new(db).list(&user.id, query.pagination()).await?;
    Ok(Json(page))
}

/// GET /api/bookmarks/:job_id
pub async fn bookmark_status(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state_lock.read().await.db.clone();
    let bookmarked = BookmarksService::new(db).is_bookmarked(&user.id, &job_id).await?;
    Ok(Json(json!({ "bookmarked": bookmarked })))
}
