// src/jobs/services/mod.rs

pub mod categories;
pub mod listings;

pub use categories::CategoriesService;
pub use listings::{JobsService, JOB_SELECT};
