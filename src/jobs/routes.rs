// src/jobs/routes.rs

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use super::handlers::{admin, categories, company, public};

/// Create the jobs router with all job-related routes
pub fn jobs_routes() -> Router {
    Router::new()
        // Public routes
        .route("/api/jobs", get(public::list_jobs))
        .route("/api/jobs/:slug", get(public::get_job_by_slug))
        .route("/api/categories", get(categories::list_categories))
        // Company posting management
        .route(
            "/api/company/jobs",
            get(company::list_own_jobs).post(company::create_job),
        )
        .route("/api/company/jobs/:id", put(company::update_job))
        .route(
            "/api/company/jobs/:id/deactivate",
            post(company::deactivate_job),
        )
        .route("/api/company/jobs/:id/activate", post(company::activate_job))
        // Admin routes
        .route("/api/admin/categories", post(categories::create_category))
        .route(
            "/api/admin/categories/:id",
            delete(categories::delete_category),
        )
        .route("/api/admin/jobs/fix-slugs", post(admin::fix_slugs))
}
