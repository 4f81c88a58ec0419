//! Authentication handlers

use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::extractors::AuthedUser;
use super::models::{Claims, LoginRequest, LoginResponse, Role, SignupRequest, User};
use super::password::{hash_password, verify_password};
use super::validators::SignupValidator;
use crate::common::error::ApiError;
use crate::common::{generate_id, now_timestamp, safe_email_log, AppState, EntityPrefix, Validator};
use crate::companies::services::CompaniesService;

/// Signs an HS256 token for `user_id` valid for `ttl_hours`.
pub fn create_jwt(user_id: &str, secret: &str, ttl_hours: i64) -> Result<String, ApiError> {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (Utc::now() + Duration::hours(ttl_hours)).timestamp() as usize,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        error!(error = %e, user_id = %user_id, "Failed to encode JWT");
        ApiError::InternalServer("jwt error".into())
    })
}

/// Runs CPU-bound password work on the blocking pool.
async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        error!(error = %e, "Password task panicked");
        ApiError::InternalServer("password processing failed".into())
    })
}

/// POST /api/auth/signup
///
/// # Request Body
/// ```json
/// { "username": "jane", "password": "...", "email": "jane@example.com",
///   "date_of_birth": "1990-05-01", "role": "seeker" }
/// ```
pub async fn signup_handler(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    Json(request): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    SignupValidator.validate(&request).into_result()?;

    let db = state.read().await.db.clone();
    let username = request.username.trim().to_string();
    let email = request.email.trim().to_lowercase();
    let role = Role::parse(&request.role).unwrap_or(Role::Seeker);

    let taken: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ? OR email = ?")
        .bind(&username)
        .bind(&email)
        .fetch_one(&db)
        .await?;
    if taken > 0 {
        return Err(ApiError::Conflict(
            "Username or Email already exists".to_string(),
        ));
    }

    let password = request.password.clone();
    let password_hash = run_blocking(move || hash_password(&password))
        .await?
        .map_err(|e| {
            error!(error = %e, "Password hashing failed");
            ApiError::InternalServer("password processing failed".into())
        })?;

    let user = User {
        id: generate_id(EntityPrefix::User),
        username,
        email,
        password_hash,
        role: role.as_str().to_string(),
        date_of_birth: request.date_of_birth.map(|d| d.trim().to_string()),
        created_at: now_timestamp(),
    };

    let mut tx = db.begin().await?;
    sqlx::query(
        r#"
        INSERT INTO users (id, username, email, password_hash, role, date_of_birth, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&user.id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.role)
    .bind(&user.date_of_birth)
    .bind(&user.created_at)
    .execute(&mut *tx)
    .await
    .map_err(|e| ApiError::conflict_on_unique(e, "Username or Email already exists"))?;

    sqlx::query(
        r#"
        INSERT INTO seeker_profiles (user_id, email, date_of_birth, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&user.id)
    .bind(&user.email)
    .bind(&user.date_of_birth)
    .bind(&user.created_at)
    .bind(&user.created_at)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    info!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        role = %user.role,
        "User signed up"
    );

    Ok((StatusCode::CREATED, Json(json!({ "user": user }))))
}

/// POST /api/auth/login
///
/// # Response
/// ```json
/// { "token": "<jwt>", "user": { ... }, "is_admin": false, "redirect": "/" }
/// ```
pub async fn login_handler(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let app_state = state.read().await.clone();

    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, email, password_hash, role, date_of_birth, created_at FROM users WHERE username = ?",
    )
    .bind(request.username.trim())
    .fetch_optional(&app_state.db)
    .await?
    .ok_or_else(|| {
        warn!(username = %request.username, "Login failed: unknown username");
        ApiError::Unauthorized("Username does not exist".to_string())
    })?;

    let password = request.password;
    let stored_hash = user.password_hash.clone();
    let verified = run_blocking(move || verify_password(&password, &stored_hash))
        .await?
        .unwrap_or_else(|e| {
            warn!(user_id = %user.id, error = %e, "Stored password hash could not be parsed");
            false
        });
    if !verified {
        warn!(user_id = %user.id, "Login failed: wrong password");
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    let token = create_jwt(&user.id, &app_state.jwt_secret, app_state.jwt_ttl_hours)?;
    let is_admin = app_state.is_admin_email(&user.email);
    let redirect = user.role().home_path().to_string();

    info!(user_id = %user.id, email = %safe_email_log(&user.email), "User logged in");

    Ok(Json(LoginResponse {
        token,
        user,
        is_admin,
        redirect,
    }))
}

/// GET /api/me
pub async fn me_handler(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let db = state.read().await.db.clone();

    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, email, password_hash, role, date_of_birth, created_at FROM users WHERE id = ?",
    )
    .bind(&authed.id)
    .fetch_optional(&db)
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    let company = if authed.is_company() {
        CompaniesService::new(db).find_by_owner(&authed.id).await?
    } else {
        None
    };

    Ok(Json(json!({
        "user": user,
        "is_admin": authed.is_admin,
        "company": company,
    })))
}

/// POST /api/auth/logout
///
/// Tokens are stateless; the client simply discards its copy.
pub async fn logout_handler(authed: AuthedUser) -> Json<serde_json::Value> {
    info!(user_id = %authed.id, "User logged out");
    Json(json!({ "message": "Logout successful" }))
}
