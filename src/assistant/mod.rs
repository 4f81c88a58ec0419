//! # Career Assistant Module
//!
//! Answers a seeker's career questions from their own profile, resume text
//! and latest analysis. Open-ended questions may be routed to the language
//! model when the `assistant_ai_enabled` setting is on.

pub mod handlers;
pub mod routes;
pub mod rules;
pub mod services;


pub use routes::assistant_routes;
pub use services::CareerAssistantService;
