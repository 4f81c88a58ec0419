// src/jobs/models.rs

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::common::helpers::parse_timestamp;

pub const EMPLOYMENT_TYPES: [&str; 5] = ["full_time", "part_time", "contract", "internship", "freelance"];
pub const EXPERIENCE_LEVELS: [&str; 4] = ["entry", "mid", "senior", "executive"];

// ============================================================================
// Categories
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub slug: Option<String>,
}

// ============================================================================
// Job postings
// ============================================================================

/// A posting joined with its company and category
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub company_id: String,
    pub company_name: String,
    pub company_logo: Option<String>,
    pub category_id: Option<String>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    pub description: String,
    pub requirements: String,
    pub responsibilities: String,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub employment_type: String,
    pub experience_level: String,
    pub location: String,
    pub remote_available: bool,
    pub is_active: bool,
    pub application_deadline: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Job {
    /// A posting is expired once its deadline has passed.
    pub fn is_expired(&self) -> bool {
        self.application_deadline
            .as_deref()
            .and_then(parse_timestamp)
            .is_some_and(|deadline| deadline < Utc::now())
    }

    /// Whether seekers can still apply.
    pub fn accepts_applications(&self) -> bool {
        self.is_active && !self.is_expired()
    }

    /// Text the matchers score a resume against.
    pub fn matching_text(&self) -> String {
        format!(
            "{}\n{}\n{}\n{}",
            self.title, self.description, self.requirements, self.responsibilities
        )
    }
}

#[derive(Debug, Serialize)]
pub struct JobView {
    #[serde(flatten)]
    pub job: Job,
    pub is_expired: bool,
}

impl From<Job> for JobView {
    fn from(job: Job) -> Self {
        let is_expired = job.is_expired();
        Self { job, is_expired }
    }
}

#[derive(Debug, Serialize)]
pub struct JobDetailResponse {
    #[serde(flatten)]
    pub job: JobView,
    pub is_bookmarked: bool,
    pub has_applied: bool,
    pub related_jobs: Vec<JobView>,
}

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub responsibilities: String,
    pub category_id: Option<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub employment_type: String,
    pub experience_level: String,
    pub location: String,
    #[serde(default)]
    pub remote_available: bool,
    pub application_deadline: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateJobRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub responsibilities: Option<String>,
    pub category_id: Option<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub employment_type: Option<String>,
    pub experience_level: Option<String>,
    pub location: Option<String>,
    pub remote_available: Option<bool>,
    pub application_deadline: Option<String>,
}

/// Query parameters for GET /api/jobs
#[derive(Debug, Default, Deserialize)]
pub struct JobQueryParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub employment_type: Option<String>,
    pub location: Option<String>,
    pub remote: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl JobQueryParams {
    pub fn remote_only(&self) -> bool {
        matches!(self.remote.as_deref(), Some("true") | Some("1") | Some("on"))
    }
}
