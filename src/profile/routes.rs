// src/profile/routes.rs

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{self, MAX_PICTURE_BYTES, MAX_RESUME_BYTES};
use crate::common::uploads::upload_body_limit;

/// Seeker profile routes
///
/// - `GET/PUT /api/profile`
/// - `GET /api/profile/completion`
/// - `POST /api/profile/resume`, `POST /api/profile/picture`
/// - `GET /uploads/resumes/:filename` (owner, admins, companies it applied to)
/// - `GET /uploads/pictures/:filename` (public)
pub fn profile_routes() -> Router {
    Router::new()
        .route(
            "/api/profile",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .route("/api/profile/completion", get(handlers::get_completion))
        .route(
            "/api/profile/resume",
            post(handlers::upload_resume).layer(upload_body_limit(MAX_RESUME_BYTES)),
        )
        .route(
            "/api/profile/picture",
            post(handlers::upload_picture).layer(upload_body_limit(MAX_PICTURE_BYTES)),
        )
        .route("/uploads/resumes/:filename", get(handlers::serve_resume))
        .route("/uploads/pictures/:filename", get(handlers::serve_picture))
}
