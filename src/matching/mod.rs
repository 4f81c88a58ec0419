//! # Matching Module
//!
//! Scoring seekers against postings and analysing their resumes:
//! - Token vectors, cosine similarity and fuzzy skill extraction
//! - Canonical skill extraction and soft-skill inference
//! - Resume quality and ATS checks
//! - Career advice, profile insights and job recommendations
//! - The pluggable `Matcher` used for application ranking

pub mod advice;
pub mod analysis;
pub mod handlers;
pub mod matcher;
pub mod quality;
pub mod recommend;
pub mod routes;
pub mod skills;
pub mod text;


pub use analysis::ResumeAnalysisService;
pub use matcher::{build_matcher, Candidate, KeywordMatcher, MatchReport, Matcher};
pub use routes::matching_routes;
