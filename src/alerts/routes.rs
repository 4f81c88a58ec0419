// src/alerts/routes.rs

use axum::{routing::post, Router};

use super::handlers;

pub fn alert_routes() -> Router {
    Router::new().route("/api/admin/job-alerts/run", post(handlers::run_job_alerts))
}
