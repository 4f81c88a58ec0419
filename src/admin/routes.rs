// src/admin/routes.rs

use axum::{
    routing::{get, put},
    Router,
};

use super::handlers;

pub fn admin_routes() -> Router {
    Router::new()
        .route("/api/admin/settings", get(handlers::list_settings))
        .route("/api/admin/settings/:key", put(handlers::update_setting))
}
