// src/applications/routes.rs

use axum::{
    routing::{get, patch, post},
    Router,
};

use super::handlers;

/// Application routes
///
/// Seekers apply and track their applications; companies review the
/// applicants to their own postings.
pub fn application_routes() -> Router {
    Router::new()
        .route(
            "/api/applications",
            get(handlers::list_my_applications).post(handlers::create_application),
        )
        .route("/api/applications/job-ids", get(handlers::applied_job_ids))
        .route("/api/applications/:id", get(handlers::get_application))
        .route("/api/applications/:id/status", patch(handlers::update_status))
        .route("/api/applications/:id/reopen", post(handlers::reopen_application))
        .route(
            "/api/company/jobs/:id/applications",
            get(handlers::list_job_applicants),
        )
}
