// src/assistant/routes.rs

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

pub fn assistant_routes() -> Router {
    Router::new()
        .route("/api/assistant/chat", post(handlers::chat))
        .route("/api/assistant/suggestions", get(handlers::suggestions))
}
