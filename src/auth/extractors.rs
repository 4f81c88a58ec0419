//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use super::models::{Claims, Role, User};
use crate::common::{safe_email_log, ApiError, AppState};

/// Authenticated user extractor
///
/// Validates the bearer JWT, loads the user row, and resolves admin rights
/// from the `ADMIN_EMAILS` allow-list. In dev mode the fixed dev user is
/// returned without a token.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub is_admin: bool,
}

impl AuthedUser {
    pub fn is_seeker(&self) -> bool {
        self.role == Role::Seeker
    }

    pub fn is_company(&self) -> bool {
        self.role == Role::Company
    }

    pub fn require_seeker(&self) -> Result<(), ApiError> {
        if self.is_seeker() {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Job seeker account required".to_string()))
        }
    }

    pub fn require_company(&self) -> Result<(), ApiError> {
        if self.is_company() {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Company account required".to_string()))
        }
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Admin access required".to_string()))
        }
    }

    fn from_user(user: User, is_admin: bool) -> Self {
        let role = user.role();
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role,
            is_admin,
        }
    }
}

async fn app_state(parts: &mut Parts) -> Result<AppState, ApiError> {
    let Extension(state_lock): Extension<Arc<RwLock<AppState>>> =
        Extension::from_request_parts(parts, &())
            .await
            .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;
    let state = state_lock.read().await.clone();
    Ok(state)
}

fn bearer_token(parts: &Parts) -> Option<String> {
    let raw = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = raw.strip_prefix("Bearer ").unwrap_or(raw).trim();
    (!token.is_empty()).then(|| token.to_string())
}

async fn resolve_user(state: &AppState, token: Option<String>) -> Result<AuthedUser, ApiError> {
    if state.dev_mode.is_enabled() {
        let dev_user = state.dev_mode.ensure_dev_user(&state.db).await?;
        let is_admin = state.dev_mode.user_is_admin || state.is_admin_email(&dev_user.email);
        debug!(
            user_id = %dev_user.id,
            email = %safe_email_log(&dev_user.email),
            is_admin = is_admin,
            "DEV MODE: Authentication bypassed"
        );
        return Ok(AuthedUser::from_user(dev_user, is_admin));
    }

    let token = token.ok_or_else(|| {
        warn!("Authentication failed: missing Authorization header");
        ApiError::Unauthorized("missing auth".into())
    })?;

    let claims = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| {
        warn!(error = %e, "JWT token validation failed");
        ApiError::Unauthorized("invalid token".into())
    })?
    .claims;

    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, email, password_hash, role, date_of_birth, created_at FROM users WHERE id = ?",
    )
    .bind(&claims.sub)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, user_id = %claims.sub, "Database error during user lookup in authentication");
        ApiError::DatabaseError(e)
    })?
    .ok_or_else(|| {
        warn!(user_id = %claims.sub, "Authentication failed: user not found in database");
        ApiError::Unauthorized("user not found".into())
    })?;

    let is_admin = state.is_admin_email(&user.email);
    debug!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        role = %user.role,
        is_admin = is_admin,
        "User authenticated"
    );
    Ok(AuthedUser::from_user(user, is_admin))
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let state = app_state(parts).await?;
        resolve_user(&state, bearer_token(parts)).await
    }
}

/// Like [`AuthedUser`] but anonymous callers (or bad tokens) yield `None`
/// instead of a 401. Used by public pages that personalise when possible.
#[derive(Debug, Clone)]
pub struct MaybeAuthedUser(pub Option<AuthedUser>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeAuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let state = app_state(parts).await?;
        let token = bearer_token(parts);
        if token.is_none() && !state.dev_mode.is_enabled() {
            return Ok(MaybeAuthedUser(None));
        }
        match resolve_user(&state, token).await {
            Ok(user) => Ok(MaybeAuthedUser(Some(user))),
            Err(ApiError::DatabaseError(e)) => Err(ApiError::DatabaseError(e)),
            Err(_) => Ok(MaybeAuthedUser(None)),
        }
    }
}
