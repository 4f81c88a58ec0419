// src/matching/routes.rs

use axum::{routing::get, Router};

use super::handlers;

/// Seeker-only matching routes
pub fn matching_routes() -> Router {
    Router::new()
        .route("/api/matching/jobs/:job_id", get(handlers::match_job))
        .route("/api/matching/recommendations", get(handlers::recommendations))
        .route("/api/matching/resume-analysis", get(handlers::resume_analysis))
        .route("/api/matching/career-advice", get(handlers::career_advice))
        .route("/api/matching/profile-insights", get(handlers::profile_insights))
}
