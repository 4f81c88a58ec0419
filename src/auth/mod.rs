//! # Auth Module
//!
//! Account and session handling:
//! - Username/password signup and login (Argon2id hashes)
//! - JWT token generation and validation
//! - Seeker/company roles and the admin allow-list
//! - AuthedUser extractor for protected routes

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod password;
pub mod routes;
pub mod validators;


pub use extractors::{AuthedUser, MaybeAuthedUser};
pub use models::{Role, User};
pub use routes::auth_routes;
