// src/notifications/routes.rs

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

pub fn notification_routes() -> Router {
    Router::new()
        .route("/api/notifications", get(handlers::list_notifications))
        .route("/api/notifications/read-all", post(handlers::mark_all_read))
        .route("/api/notifications/:id/read", post(handlers::mark_read))
}
