//! Authentication routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// # Routes
/// - `POST /api/auth/signup` - Create a seeker or company account
/// - `POST /api/auth/login` - Exchange username/password for a JWT
/// - `POST /api/auth/logout` - Logout (client-side token removal)
/// - `GET /api/me` - Current user, admin flag and company
pub fn auth_routes() -> Router {
    Router::new()
        .route("/api/auth/signup", post(handlers::signup_handler))
        .route("/api/auth/login", post(handlers::login_handler))
        .route("/api/auth/logout", post(handlers::logout_handler))
        .route("/api/me", get(handlers::me_handler))
}
