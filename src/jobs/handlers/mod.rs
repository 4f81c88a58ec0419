// src/jobs/handlers/mod.rs

pub mod admin;
pub mod categories;
pub mod company;
pub mod public;
