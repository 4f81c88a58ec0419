// src/admin/models.rs

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UpdateSettingRequest {
    pub value: String,
    /// Defaults to sealing the keys that hold credentials
    pub encrypted: Option<bool>,
}

/// Keys sealed when the request does not say otherwise
pub const SENSITIVE_KEYS: [&str; 1] = ["openai_api_key"];

pub fn is_valid_setting_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= 100
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
