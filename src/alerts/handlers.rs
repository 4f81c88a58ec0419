// src/alerts/handlers.rs

use axum::{extract::Extension, response::IntoResponse, Json};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::services::send_job_alerts;
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState};

/// POST /api/admin/job-alerts/run
pub async fn run_job_alerts(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;
    let db = state_lock.read().await.db.clone();

    info!(admin_id = %user.id, "Job alerts triggered manually");
    let run = send_job_alerts(&db, Utc::now()).await?;
    Ok(Json(run))
}
