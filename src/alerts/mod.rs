//! # Alerts Module
//!
//! Daily job alerts: seekers are notified about postings from the last 24
//! hours that mention their first three skills. Runs on an interval task
//! and on demand from the admin API.

pub mod handlers;
pub mod routes;
pub mod services;

#[cfg(test)]
mod tests;

pub use routes::alert_routes;
pub use services::{send_job_alerts, start_alert_task, AlertRun};
