// src/bookmarks/routes.rs

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

pub fn bookmark_routes() -> Router {
    Router::new()
        .route("/api/bookmarks", get(handlers::list_bookmarks))
        .route("/api/bookmarks/:job_id", get(handlers::bookmark_status))
        .route("/api/bookmarks/:job_id/toggle", post(handlers::toggle_bookmark))
}
