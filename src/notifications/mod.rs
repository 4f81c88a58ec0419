//! # Notifications Module
//!
//! In-app notifications written by application status changes and job
//! alerts, read through a small inbox API.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;


pub use routes::notification_routes;
pub use services::NotificationService;
