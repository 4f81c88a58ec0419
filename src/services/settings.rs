// src/services/settings.rs
//! Runtime settings stored in `system_settings`.
//!
//! Lookups go cache -> database -> environment (`KEY` upper-cased). Cached
//! entries live for five minutes and are dropped on every write.

use crate::services::encryption::{EncryptionError, EncryptionService};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use std::collections::HashMap;
use std::env;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Encryption error: {0}")]
    EncryptionError(#[from] EncryptionError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Debug, Clone)]
struct CachedSetting {
    value: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct SettingRow {
    key: String,
    value: String,
    encrypted: Option<i64>,
    updated_at: Option<String>,
    updated_by: Option<String>,
}

/// Listing entry for the admin API; sealed values are never echoed back
#[derive(Debug, Serialize)]
pub struct SettingEntry {
    pub key: String,
    pub value: String,
    pub encrypted: bool,
    pub updated_at: Option<String>,
    pub updated_by: Option<String>,
}

const MASK: &str = "********";

#[derive(Debug)]
pub struct SettingsService {
    db_pool: SqlitePool,
    cache: RwLock<HashMap<String, CachedSetting>>,
    encryption_service: Option<EncryptionService>,
    cache_ttl: Duration,
}

impl SettingsService {
    /// Uses `ENCRYPTION_MASTER_KEY` when it is present and valid.
    pub fn new(db_pool: SqlitePool) -> Self {
        let encryption_service = match EncryptionService::from_env() {
            Ok(service) => {
                info!("Encryption service initialized successfully");
                Some(service)
            }
            Err(e) => {
                warn!(error = %e, "Encryption service not available; sealed settings are disabled");
                None
            }
        };
        Self::with_encryption(db_pool, encryption_service)
    }

    pub fn with_encryption(db_pool: SqlitePool, encryption_service: Option<EncryptionService>) -> Self {
        Self {
            db_pool,
            cache: RwLock::new(HashMap::new()),
            encryption_service,
            cache_ttl: Duration::minutes(5),
        }
    }

    fn open(&self, key: &str, value: String, encrypted: bool) -> Result<String, SettingsError> {
        if !encrypted {
            return Ok(value);
        }
        let service = self.encryption_service.as_ref().ok_or_else(|| {
            error!(key = %key, "Setting is encrypted but encryption service not available");
            SettingsError::InvalidConfig("Encryption service not configured".to_string())
        })?;
        service.decrypt(&value).map_err(|e| {
            error!(key = %key, error = %e, "Failed to decrypt setting");
            SettingsError::EncryptionError(e)
        })
    }

    pub async fn get_setting(&self, key: &str) -> Result<Option<String>, SettingsError> {
        if let Some(cached) = self.cache.read().await.get(key) {
            if cached.expires_at > Utc::now() {
                debug!(key = %key, "Setting retrieved from cache");
                return Ok(Some(cached.value.clone()));
            }
        }

        let row = sqlx::query_as::<_, (String, Option<i64>)>(
            "SELECT value, encrypted FROM system_settings WHERE key = ?",
        )
        .bind(key)
        .fetch_optional(&self.db_pool)
        .await?;

        match row {
            Some((value, encrypted)) => {
                let value = self.open(key, value, encrypted.unwrap_or(0) == 1)?;
                self.cache.write().await.insert(
                    key.to_string(),
                    CachedSetting {
                        value: value.clone(),
                        expires_at: Utc::now() + self.cache_ttl,
                    },
                );
                Ok(Some(value))
            }
            None => Ok(env::var(key.to_uppercase()).ok().filter(|v| !v.is_empty())),
        }
    }

    /// `true`, `1`, `yes` and `on` (any case) count as enabled.
    pub async fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get_setting(key).await {
            Ok(Some(v)) => matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on"),
            Ok(None) => default,
            Err(e) => {
                warn!(key = %key, error = %e, "Falling back to default for setting");
                default
            }
        }
    }

    pub async fn set_setting(
        &self,
        key: &str,
        value: &str,
        encrypt: bool,
        updated_by: Option<&str>,
    ) -> Result<(), SettingsError> {
        let stored_value = if encrypt {
            let service = self.encryption_service.as_ref().ok_or_else(|| {
                SettingsError::InvalidConfig(
                    "Cannot encrypt setting: encryption service not configured".to_string(),
                )
            })?;
            service.encrypt(value)?
        } else {
            value.to_string()
        };

        sqlx::query(
            r#"
            INSERT INTO system_settings (key, value, encrypted, updated_at, updated_by)
            VALUES (?, ?, ?, datetime('now'), ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                encrypted = excluded.encrypted,
                updated_at = excluded.updated_at,
                updated_by = excluded.updated_by
            "#,
        )
        .bind(key)
        .bind(&stored_value)
        .bind(encrypt as i64)
        .bind(updated_by)
        .execute(&self.db_pool)
        .await?;

        self.cache.write().await.remove(key);

        info!(key = %key, encrypted = encrypt, "Setting updated successfully");
        Ok(())
    }

    /// All stored settings with sealed values masked.
    pub async fn list_settings(&self) -> Result<Vec<SettingEntry>, SettingsError> {
        let rows = sqlx::query_as::<_, SettingRow>(
            "SELECT key, value, encrypted, updated_at, updated_by FROM system_settings ORDER BY key",
        )
        .fetch_all(&self.db_pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let encrypted = row.encrypted.unwrap_or(0) == 1;
                SettingEntry {
                    key: row.key,
                    value: if encrypted { MASK.to_string() } else { row.value },
                    encrypted,
                    updated_at: row.updated_at,
                    updated_by: row.updated_by,
                }
            })
            .collect())
    }

    pub async fn delete_setting(&self, key: &str) -> Result<(), SettingsError> {
        sqlx::query("DELETE FROM system_settings WHERE key = ?")
            .bind(key)
            .execute(&self.db_pool)
            .await?;
        self.cache.write().await.remove(key);

        info!(key = %key, "Setting deleted");
        Ok(())
    }

    pub fn is_encryption_available(&self) -> bool {
        self.encryption_service.is_some()
    }
}
