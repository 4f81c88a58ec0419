//! # Companies Module
//!
//! Employer accounts and their moderation:
//! - One company profile per company-role user, created `pending`
//! - Owner-only edits and logo uploads
//! - Admin approve/reject (single and bulk)
//! - Public directory of approved companies

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;

#[cfg(test)]
mod tests;

pub use models::{Company, CompanyStatus};
pub use routes::companies_routes;
pub use services::CompaniesService;
