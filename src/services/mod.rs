// src/services/mod.rs
//
// Shared services used across the domain modules

pub mod encryption;
pub mod openai;
pub mod rate_limit;
pub mod settings;

pub use openai::OpenAIService;
pub use rate_limit::RateLimitService;
pub use settings::SettingsService;
