// Application state shared across all modules

use sqlx::SqlitePool;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use crate::common::dev_mode::DevModeConfig;
use crate::matching::Matcher;
use crate::services::{OpenAIService, RateLimitService, SettingsService};

/// Application state containing database pool, services, and configuration
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub resumes_dir: PathBuf,
    pub pictures_dir: PathBuf,
    pub logos_dir: PathBuf,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub admin_emails: HashSet<String>,
    pub dev_mode: DevModeConfig,
    pub settings_service: Arc<SettingsService>,
    pub openai_service: Arc<OpenAIService>,
    pub rate_limit_service: Arc<RateLimitService>,
    pub matcher: Arc<dyn Matcher>,
}

impl AppState {
    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_emails.contains(&email.to_lowercase())
    }
}
