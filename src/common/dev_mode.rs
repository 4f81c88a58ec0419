// src/common/dev_mode.rs
//! Development mode configuration and utilities
//! Allows bypassing authentication for local testing

use chrono::Utc;
use sqlx::SqlitePool;
use std::env;
use tracing::info;

use crate::auth::models::{Role, User};

/// Fixed ID so every dev-mode request resolves to the same row
pub const DEV_USER_ID: &str = "U_DEV000";

#[derive(Debug, Clone)]
pub struct DevModeConfig {
    pub enabled: bool,
    pub user_email: String,
    pub user_role: Role,
    pub user_is_admin: bool,
}

impl Default for DevModeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            user_email: "dev@test.com".to_string(),
            user_role: Role::Seeker,
            user_is_admin: false,
        }
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key)
        .unwrap_or_else(|_| "false".to_string())
        .to_lowercase()
        == "true"
}

impl DevModeConfig {
    pub fn from_env() -> Self {
        let user_role = env::var("DEV_USER_ROLE")
            .ok()
            .and_then(|r| Role::parse(&r))
            .unwrap_or(Role::Seeker);

        Self {
            enabled: env_flag("DEV_MODE"),
            user_email: env::var("DEV_USER_EMAIL").unwrap_or_else(|_| "dev@test.com".to_string()),
            user_role,
            user_is_admin: env_flag("DEV_USER_IS_ADMIN"),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn create_dev_user(&self) -> User {
        User {
            id: DEV_USER_ID.to_string(),
            username: "dev".to_string(),
            email: self.user_email.to_lowercase(),
            password_hash: String::new(),
            role: self.user_role.as_str().to_string(),
            date_of_birth: None,
            created_at: Utc::now().to_rfc3339(),
        }
    }

    /// Inserts the dev user and its empty profile when they are missing, so
    /// foreign keys from applications and bookmarks resolve.
    pub async fn ensure_dev_user(&self, pool: &SqlitePool) -> Result<User, sqlx::Error> {
        let user = self.create_dev_user();

        sqlx::query(
            r#"
            INSERT OR IGNORE INTO users (id, username, email, password_hash, role, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.role)
        .bind(&user.created_at)
        .execute(pool)
        .await?;

        sqlx::query(
            "INSERT OR IGNORE INTO seeker_profiles (user_id, created_at, updated_at) VALUES (?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.created_at)
        .bind(&user.created_at)
        .execute(pool)
        .await?;

        Ok(user)
    }
}

/// Print dev mode status on startup
pub fn print_dev_mode_status(config: &DevModeConfig) {
    if config.enabled {
        println!("⚠️  🔓 DEV MODE ENABLED 🔓 ⚠️");
        println!("   Authentication bypassed for testing");
        println!(
            "   Dev User: {} (role: {})",
            config.user_email,
            config.user_role.as_str()
        );
        println!(
            "   Admin: {}",
            if config.user_is_admin { "Yes" } else { "No" }
        );
        println!("   ⚠️  DO NOT USE IN PRODUCTION ⚠️");
        println!();
    } else {
        info!("🔒 Production mode - Authentication required");
    }
}

/// Returns `Some(true)` for `--dev`, `Some(false)` for `--prod`, else `None`.
pub fn parse_dev_mode_args<I, S>(args: I) -> Option<bool>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for arg in args {
        match arg.as_ref() {
            "--dev" | "--dev-mode" => return Some(true),
            "--no-dev" | "--prod" | "--production" => return Some(false),
            _ => {}
        }
    }
    None
}

/// Override dev mode from CLI args
pub fn apply_cli_override(mut config: DevModeConfig) -> DevModeConfig {
    if let Some(cli_dev_mode) = parse_dev_mode_args(env::args()) {
        println!("🔧 CLI override: DEV_MODE = {}", cli_dev_mode);
        config.enabled = cli_dev_mode;
    }

    config
}
