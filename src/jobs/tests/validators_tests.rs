// src/jobs/tests/validators_tests.rs

#[cfg(test)]
mod tests {
    use crate::common::Validator;
    use crate::jobs::models::*;
    use crate::jobs::validators::*;
    use chrono::{Duration, Utc};

    fn valid_request() -> CreateJobRequest {
        CreateJobRequest {
            title: "Software Engineer".to_string(),
            description: "Build and run services".to_string(),
            requirements: "Rust, SQL".to_string(),
            responsibilities: "Own the billing service".to_string(),
            category_id: None,
            salary_min: Some(50000),
            salary_max: Some(100000),
            employment_type: "full_time".to_string(),
            experience_level: "mid".to_string(),
            location: "Remote".to_string(),
            remote_available: true,
            application_deadline: None,
        }
    }

    #[test]
    fn test_job_validator_valid_data() {
        let result = JobValidator.validate(&valid_request());
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_job_validator_required_fields() {
        let mut request = valid_request();
        request.title = "".to_string();
        request.requirements = "   ".to_string();
        request.location = "".to_string();

        let result = JobValidator.validate(&request);
        assert!(!result.is_valid);
        assert!(result.has_error("title"));
        assert!(result.has_error("requirements"));
        assert!(result.has_error("location"));
        assert!(!result.has_error("description"));
    }

    #[test]
    fn test_job_validator_title_too_long() {
        let mut request = valid_request();
        request.title = "a".repeat(256);
        assert!(JobValidator.validate(&request).has_error("title"));

        request.title = "a".repeat(255);
        assert!(JobValidator.validate(&request).is_valid);
    }

    #[test]
    fn test_job_validator_salary_range() {
        let mut request = valid_request();
        request.salary_min = Some(120000);
        assert!(JobValidator.validate(&request).has_error("salary_range"));

        request.salary_min = Some(-1);
        request.salary_max = None;
        assert!(JobValidator.validate(&request).has_error("salary_min"));
    }

    #[test]
    fn test_job_validator_enums() {
        let mut request = valid_request();
        request.employment_type = "full-time".to_string();
        request.experience_level = "guru".to_string();

        let result = JobValidator.validate(&request);
        assert!(result.has_error("employment_type"));
        assert!(result.has_error("experience_level"));
    }

    #[test]
    fn test_job_validator_deadline() {
        let mut request = valid_request();
        request.application_deadline = Some("next tuesday".to_string());
        assert!(JobValidator.validate(&request).has_error("application_deadline"));

        request.application_deadline = Some((Utc::now() - Duration::days(1)).to_rfc3339());
        assert!(JobValidator.validate(&request).has_error("application_deadline"));

        request.application_deadline = Some((Utc::now() + Duration::days(30)).to_rfc3339());
        assert!(JobValidator.validate(&request).is_valid);
    }

    #[test]
    fn test_blank_deadline_clears_rather_than_fails() {
        let mut request = valid_request();
        request.application_deadline = Some("   ".to_string());
        assert!(JobValidator.validate(&request).is_valid);

        let request = UpdateJobRequest {
            application_deadline: Some(String::new()),
            ..Default::default()
        };
        assert!(JobValidator.validate(&request).is_valid);
    }

    #[test]
    fn test_update_validator_only_checks_present_fields() {
        let request = UpdateJobRequest {
            location: Some("Paris".to_string()),
            ..Default::default()
        };
        assert!(JobValidator.validate(&request).is_valid);

        let request = UpdateJobRequest {
            employment_type: Some("gig".to_string()),
            ..Default::default()
        };
        assert!(JobValidator.validate(&request).has_error("employment_type"));
    }

    #[test]
    fn test_category_validator() {
        let ok = CreateCategoryRequest {
            name: "Data Science".to_string(),
            slug: None,
        };
        assert!(CategoryValidator.validate(&ok).is_valid);

        let bad = CreateCategoryRequest {
            name: "Data".to_string(),
            slug: Some("Data Science".to_string()),
        };
        assert!(CategoryValidator.validate(&bad).has_error("slug"));
    }
}
