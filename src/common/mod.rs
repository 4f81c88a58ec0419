// Common module - shared types and utilities across all modules

pub mod dev_mode;
pub mod error;
pub mod helpers;
pub mod id_generator;
pub mod migrations;
pub mod pagination;
pub mod state;
pub mod uploads;
pub mod validation;

#[cfg(test)]
pub mod test_support;

pub use error::ApiError;
pub use helpers::{now_timestamp, safe_email_log};
pub use id_generator::*;
pub use pagination::{Page, PageQuery, Pagination};
pub use state::AppState;
pub use validation::{ValidationError, ValidationResult, Validator};
