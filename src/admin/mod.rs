// src/admin/mod.rs
//! Administrator endpoints for runtime settings

pub mod handlers;
pub mod models;
pub mod routes;


pub use routes::admin_routes;
