// src/jobs/handlers/admin.rs

use axum::{extract::Extension, response::Json};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState};
use crate::jobs::services::JobsService;

/// POST /api/admin/jobs/fix-slugs - Repair malformed job slugs
pub async fn fix_slugs(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<Value>, ApiError> {
    authed.require_admin()?;

    let db = state_lock.read().await.db.clone();
    let fixed = JobsService::new(db).fix_slugs().await?;

    info!(admin_id = %authed.id, fixed = fixed, "Slug repair finished");

    Ok(Json(json!({ "fixed": fixed })))
}
