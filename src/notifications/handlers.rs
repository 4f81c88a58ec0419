// src/notifications/handlers.rs

use axum::{
    extract::{Extension, Path},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::services::NotificationService;
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState};

/// GET /api/notifications
pub async fn list_notifications(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    let db = state_lock.read().await.db.clone();
    let inbox = NotificationService::new(db).inbox(&user.id).await?;
    Ok(Json(inbox))
}

/// POST /api/notifications/:id/read
pub async fn mark_read(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(notification_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state_lock.read().await.db.clone();
    NotificationService::new(db)
        .mark_read(&user.id, &notification_id)
        .await?;
    Ok(Json(json!({ "status": "success" })))
}

/// POST /api/notifications/read-all
pub async fn mark_all_read(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    let db = state_lock.read().await.db.clone();
    let updated = NotificationService::new(db).mark_all_read(&user.id).await?;
    info!(user_id = %user.id, updated, "Notifications marked read");
    Ok(Json(json!({ "status": "success" })))
}
