// src/jobs/handlers/company.rs
//! Posting management for the signed-in company

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState, PageQuery};
use crate::companies::{CompaniesService, Company};
use crate::jobs::models::*;
use crate::jobs::services::JobsService;

/// The caller's company if it has one at all, approved or not.
async fn own_company(db: &sqlx::SqlitePool, user: &AuthedUser) -> Result<Company, ApiError> {
    user.require_company()?;
    CompaniesService::new(db.clone())
        .find_by_owner(&user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("You have not created a company yet".to_string()))
}

/// The caller's company, which must be approved to write postings.
async fn approved_company(db: &sqlx::SqlitePool, user: &AuthedUser) -> Result<Company, ApiError> {
    user.require_company()?;
    CompaniesService::new(db.clone())
        .require_approved_company(&user.id)
        .await
}

/// POST /api/company/jobs
pub async fn create_job(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Json(request): Json<CreateJobRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state_lock.read().await.db.clone();
    let company = approved_company(&db, &user).await?;

    let job = JobsService::new(db).create_job(&company, request).await?;

    Ok((StatusCode::CREATED, Json(JobView::from(job))))
}

/// GET /api/company/jobs
pub async fn list_own_jobs(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state_lock.read().await.db.clone();
    let company = own_company(&db, &user).await?;

    let page = JobsService::new(db)
        .list_company_jobs(&company.id, query.pagination())
        .await?;

    Ok(Json(page))
}

/// PUT /api/company/jobs/:id
pub async fn update_job(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(job_id): Path<String>,
    Json(request): Json<UpdateJobRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state_lock.read().await.db.clone();
    let company = approved_company(&db, &user).await?;

    let job = JobsService::new(db).update_job(&company, &job_id, request).await?;

    Ok(Json(JobView::from(job)))
}

/// POST /api/company/jobs/:id/deactivate
pub async fn deactivate_job(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state_lock.read().await.db.clone();
    let company = own_company(&db, &user).await?;

    let job = JobsService::new(db).set_active(&company, &job_id, false).await?;

    Ok(Json(JobView::from(job)))
}

/// POST /api/company/jobs/:id/activate
pub async fn activate_job(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state_lock.read().await.db.clone();
    let company = approved_company(&db, &user).await?;

    let job = JobsService::new(db).set_active(&company, &job_id, true).await?;

    Ok(Json(JobView::from(job)))
}
