//! # Bookmarks Module
//!
//! Saved jobs: toggle, check and a paginated list.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

#[cfg(test)]
mod tests;

pub use routes::bookmark_routes;
pub use services::BookmarksService;
