// src/applications/handlers.rs

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::models::{ApplicantsQuery, CreateApplicationRequest, ReopenRequest, UpdateStatusRequest};
use super::ranking::{rank_or_unranked, unranked, RANKING_TIMEOUT};
use super::services::ApplicationsService;
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState};
use crate::jobs::JobView;
use crate::profile::ProfileService;

/// POST /api/applications
pub async fn create_application(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Json(request): Json<CreateApplicationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_seeker()?;
    let db = state_lock.read().await.db.clone();

    let profile = ProfileService::new(db.clone()).get_profile(&user.id).await?;
    let application = ApplicationsService::new(db).apply(&profile, request).await?;

    Ok((StatusCode::CREATED, Json(application)))
}

/// GET /api/applications
pub async fn list_my_applications(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    user.require_seeker()?;
    let db = state_lock.read().await.db.clone();
    let applications = ApplicationsService::new(db).list_for_seeker(&user.id).await?;
    Ok(Json(applications))
}

/// GET /api/applications/job-ids
pub async fn applied_job_ids(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    let db = state_lock.read().await.db.clone();
    let job_ids = ApplicationsService::new(db).get_applied_job_ids(&user.id).await?;
    Ok(Json(json!({ "job_ids": job_ids })))
}

/// GET /api/applications/:id
pub async fn get_application(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(application_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state_lock.read().await.db.clone();
    let detail = ApplicationsService::new(db).get_detail(&user, &application_id).await?;
    Ok(Json(detail))
}

/// PATCH /api/applications/:id/status
pub async fn update_status(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(application_id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state_lock.read().await.db.clone();
    let application = ApplicationsService::new(db)
        .update_status(&user, &application_id, &request.status, request.notes.as_deref())
        .await?;
    Ok(Json(application))
}

/// POST /api/applications/:id/reopen
pub async fn reopen_application(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(application_id): Path<String>,
    request: Option<Json<ReopenRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state_lock.read().await.db.clone();
    let Json(request) = request.unwrap_or_default();
    let application = ApplicationsService::new(db)
        .reopen(&user, &application_id, request.notes.as_deref())
        .await?;
    Ok(Json(application))
}

/// GET /api/company/jobs/:id/applications?ranked=true
pub async fn list_job_applicants(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(job_id): Path<String>,
    Query(query): Query<ApplicantsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();
    let ranked = query.ranked.unwrap_or(false);

    let (job, rows) = ApplicationsService::new(state.db.clone())
        .list_for_job(&user, &job_id)
        .await?;

    let applicants = if ranked {
        rank_or_unranked(state.matcher.as_ref(), &job, &rows, RANKING_TIMEOUT).await
    } else {
        unranked(&rows)
    };

    Ok(Json(json!({
        "job": JobView::from(job),
        "ranked": ranked,
        "total": applicants.len(),
        "applicants": applicants,
    })))
}
