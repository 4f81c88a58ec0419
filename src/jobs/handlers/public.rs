// src/jobs/handlers/public.rs

use axum::{
    extract::{Extension, Path, Query},
    response::Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::auth::MaybeAuthedUser;
use crate::common::{ApiError, AppState, Page};
use crate::jobs::models::*;
use crate::jobs::services::JobsService;

/// GET /api/jobs - Active jobs, newest first, with optional filters
pub async fn list_jobs(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Query(params): Query<JobQueryParams>,
) -> Result<Json<Page<JobView>>, ApiError> {
    let db = state_lock.read().await.db.clone();

    let page = JobsService::new(db).list_public(&params).await?;

    debug!(
        total = page.total,
        page = page.page,
        search = ?params.search,
        category = ?params.category,
        "Listed public jobs"
    );

    Ok(Json(page))
}

/// GET /api/jobs/:slug - Job detail with viewer flags and related jobs
pub async fn get_job_by_slug(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    MaybeAuthedUser(viewer): MaybeAuthedUser,
    Path(slug): Path<String>,
) -> Result<Json<JobDetailResponse>, ApiError> {
    let db = state_lock.read().await.db.clone();
    let jobs_service = JobsService::new(db);

    let job = jobs_service.get_visible_by_slug(&slug).await?;
    let related_jobs = jobs_service.related_jobs(&job).await?;

    let (is_bookmarked, has_applied) = match &viewer {
        Some(user) => jobs_service.viewer_flags(&user.id, &job.id).await?,
        None => (false, false),
    };

    Ok(Json(JobDetailResponse {
        job: JobView::from(job),
        is_bookmarked,
        has_applied,
        related_jobs,
    }))
}
