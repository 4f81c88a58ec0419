// src/jobs/validators.rs

use super::models::*;
use crate::common::helpers::parse_timestamp;
use crate::common::{ValidationResult, Validator};
use chrono::Utc;

const MAX_TITLE: usize = 255;
const MAX_BODY: usize = 10000;

// ============================================================================
// Job Validators
// ============================================================================

pub struct JobValidator;

/// Salaries are optional, but never negative and never inverted.
pub fn check_salary_range(result: &mut ValidationResult, min: Option<i64>, max: Option<i64>) {
    if min.is_some_and(|v| v < 0) {
        result.add_error("salary_min", "Minimum salary cannot be negative");
    }
    if max.is_some_and(|v| v < 0) {
        result.add_error("salary_max", "Maximum salary cannot be negative");
    }
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            result.add_error(
                "salary_range",
                "Minimum salary cannot be greater than maximum salary",
            );
        }
    }
}

fn check_employment_type(result: &mut ValidationResult, value: &str) {
    if !EMPLOYMENT_TYPES.contains(&value) {
        result.add_error(
            "employment_type",
            &format!("Employment type must be one of: {}", EMPLOYMENT_TYPES.join(", ")),
        );
    }
}

fn check_experience_level(result: &mut ValidationResult, value: &str) {
    if !EXPERIENCE_LEVELS.contains(&value) {
        result.add_error(
            "experience_level",
            &format!("Experience level must be one of: {}", EXPERIENCE_LEVELS.join(", ")),
        );
    }
}

/// Deadlines are RFC 3339 and must lie in the future when set. A blank
/// value clears the deadline.
fn check_deadline(result: &mut ValidationResult, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }
    match parse_timestamp(value) {
        Some(deadline) if deadline <= Utc::now() => {
            result.add_error(
                "application_deadline",
                "Application deadline must be in the future",
            );
        }
        Some(_) => {}
        None => result.add_error(
            "application_deadline",
            "Application deadline must be an RFC 3339 timestamp",
        ),
    }
}

impl Validator<CreateJobRequest> for JobValidator {
    fn validate(&self, data: &CreateJobRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        result.require_text("title", "Job title", &data.title, MAX_TITLE);
        result.require_text("description", "Description", &data.description, MAX_BODY);
        result.require_text("requirements", "Requirements", &data.requirements, MAX_BODY);
        result.require_text(
            "responsibilities",
            "Responsibilities",
            &data.responsibilities,
            MAX_BODY,
        );
        result.require_text("location", "Location", &data.location, MAX_TITLE);

        check_salary_range(&mut result, data.salary_min, data.salary_max);
        check_employment_type(&mut result, &data.employment_type);
        check_experience_level(&mut result, &data.experience_level);

        if let Some(deadline) = &data.application_deadline {
            check_deadline(&mut result, deadline);
        }

        result
    }
}

/// Field-by-field checks only; the salary range is re-checked against the
/// stored posting once the update has been merged.
impl Validator<UpdateJobRequest> for JobValidator {
    fn validate(&self, data: &UpdateJobRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if let Some(title) = &data.title {
            result.require_text("title", "Job title", title, MAX_TITLE);
        }
        if let Some(description) = &data.description {
            result.require_text("description", "Description", description, MAX_BODY);
        }
        if let Some(requirements) = &data.requirements {
            result.require_text("requirements", "Requirements", requirements, MAX_BODY);
        }
        if let Some(responsibilities) = &data.responsibilities {
            result.require_text("responsibilities", "Responsibilities", responsibilities, MAX_BODY);
        }
        if let Some(location) = &data.location {
            result.require_text("location", "Location", location, MAX_TITLE);
        }
        if let Some(employment_type) = &data.employment_type {
            check_employment_type(&mut result, employment_type);
        }
        if let Some(experience_level) = &data.experience_level {
            check_experience_level(&mut result, experience_level);
        }
        if let Some(deadline) = &data.application_deadline {
            check_deadline(&mut result, deadline);
        }

        result
    }
}

// ============================================================================
// Category Validators
// ============================================================================

pub struct CategoryValidator;

impl Validator<CreateCategoryRequest> for CategoryValidator {
    fn validate(&self, data: &CreateCategoryRequest) -> ValidationResult {
        let mut result = ValidationResult::new();
        result.require_text("name", "Category name", &data.name, 100);
        if let Some(slug) = &data.slug {
            if !slug.trim().is_empty() && !super::slug::is_clean_slug(slug.trim()) {
                result.add_error(
                    "slug",
                    "Slug may only contain lowercase letters, digits and single dashes",
                );
            }
        }
        result
    }
}
