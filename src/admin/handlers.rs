// src/admin/handlers.rs

use axum::{
    extract::{Extension, Path},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::models::{is_valid_setting_key, UpdateSettingRequest, SENSITIVE_KEYS};
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState, ValidationResult};
use crate::services::settings::SettingsError;

fn settings_failure(e: SettingsError) -> ApiError {
    match e {
        SettingsError::InvalidConfig(msg) => ApiError::BadRequest(msg),
        SettingsError::DatabaseError(db) => ApiError::DatabaseError(db),
        other => {
            error!(error = %other, "Settings operation failed");
            ApiError::InternalServer("Failed to process settings".to_string())
        }
    }
}

/// GET /api/admin/settings
pub async fn list_settings(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;
    let state = state_lock.read().await.clone();

    let settings = state.settings_service.list_settings().await.map_err(settings_failure)?;
    info!(admin_user_id = %user.id, settings_count = settings.len(), "System settings fetched");

    Ok(Json(json!({
        "settings": settings,
        "encryption_available": state.settings_service.is_encryption_available(),
    })))
}

/// PUT /api/admin/settings/:key
pub async fn update_setting(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(key): Path<String>,
    Json(payload): Json<UpdateSettingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;

    if !is_valid_setting_key(&key) {
        let mut validation = ValidationResult::new();
        validation.add_error("key", "Setting keys use letters, digits, '_' and '-'");
        return Err(validation.into());
    }

    let state = state_lock.read().await.clone();
    let encrypt = payload
        .encrypted
        .unwrap_or_else(|| SENSITIVE_KEYS.contains(&key.as_str()));

    if encrypt && !state.settings_service.is_encryption_available() {
        warn!(admin_user_id = %user.id, setting_key = %key, "Encryption requested but not available");
        return Err(ApiError::BadRequest(
            "Encryption not configured. Set ENCRYPTION_MASTER_KEY environment variable.".to_string(),
        ));
    }

    state
        .settings_service
        .set_setting(&key, &payload.value, encrypt, Some(&user.id))
        .await
        .map_err(settings_failure)?;

    info!(admin_user_id = %user.id, setting_key = %key, encrypted = encrypt, "System setting updated");
    Ok(Json(json!({ "key": key, "encrypted": encrypt, "status": "success" })))
}
