//! # Applications Module
//!
//! Seekers apply to postings; the hiring company moves each application
//! through the status machine in [`status`]. Every change is recorded in
//! the status history and, unless the applicant made it, announced to the
//! applicant through a notification.

pub mod handlers;
pub mod models;
pub mod ranking;
pub mod routes;
pub mod services;
pub mod status;

#[cfg(test)]
mod tests;

pub use routes::application_routes;
pub use services::ApplicationsService;
