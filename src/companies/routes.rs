use super::handlers::{self, MAX_LOGO_BYTES};
use crate::common::uploads::upload_body_limit;
use axum::{
    routing::{get, post},
    Router,
};

/// Creates the companies router
///
/// # Routes
/// - `POST /api/companies` / `GET /api/companies` - Register / public directory
/// - `GET /api/companies/mine` - The caller's own company
/// - `GET|PUT /api/companies/:id` - Show / edit (owner)
/// - `POST /api/companies/:id/logo` - Logo upload (owner)
/// - `GET /api/logos/:filename` - Logo files
/// - `/api/admin/companies*` - Moderation
pub fn companies_routes() -> Router {
    Router::new()
        .route(
            "/api/companies",
            get(handlers::list_companies).post(handlers::create_company),
        )
        .route("/api/companies/mine", get(handlers::get_my_company))
        .route(
            "/api/companies/:id",
            get(handlers::get_company).put(handlers::update_company),
        )
        .route(
            "/api/companies/:id/logo",
            post(handlers::upload_logo).layer(upload_body_limit(MAX_LOGO_BYTES)),
        )
        .route("/api/logos/:filename", get(handlers::serve_logo))
        // Moderation
        .route("/api/admin/companies", get(handlers::admin_list_companies))
        .route(
            "/api/admin/companies/bulk-status",
            post(handlers::bulk_update_status),
        )
        .route(
            "/api/admin/companies/:id/approve",
            post(handlers::approve_company),
        )
        .route(
            "/api/admin/companies/:id/reject",
            post(handlers::reject_company),
        )
}

