//! # Profile Module
//!
//! The job seeker's own profile:
//! - Contact details, skills and date of birth
//! - Resume PDF upload with text extraction and analysis refresh
//! - Profile picture upload
//! - Access-checked file serving

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;


pub use models::SeekerProfile;
pub use routes::profile_routes;
pub use services::ProfileService;
