// src/jobs/mod.rs
//! # Jobs Module
//!
//! - Categories (public list, admin create/delete)
//! - Company-side posting CRUD and activation
//! - Public filtered listing and slug-addressed detail pages
//! - Slug generation and repair

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod slug;
pub mod validators;

#[cfg(test)]
mod tests;

// Re-export commonly used items
pub use models::{Job, JobView};
pub use routes::jobs_routes;
pub use services::JobsService;
