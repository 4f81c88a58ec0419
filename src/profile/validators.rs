// src/profile/validators.rs

use super::models::UpdateProfileRequest;
use crate::auth::validators::validate_date_of_birth;
use crate::common::validation::{is_valid_email, is_valid_phone};
use crate::common::{ValidationResult, Validator};

const MAX_NAME_LENGTH: usize = 100;
const MAX_SKILLS_LENGTH: usize = 2000;

pub struct ProfileValidator;

impl Validator<UpdateProfileRequest> for ProfileValidator {
    fn validate(&self, data: &UpdateProfileRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.is_empty() {
            result.add_error("general", "At least one field must be provided for update");
            return result;
        }

        if let Some(first_name) = &data.first_name {
            if first_name.chars().count() > MAX_NAME_LENGTH {
                result.add_error("first_name", "First name must be 100 characters or fewer");
            }
        }

        if let Some(last_name) = &data.last_name {
            if last_name.chars().count() > MAX_NAME_LENGTH {
                result.add_error("last_name", "Last name must be 100 characters or fewer");
            }
        }

        // blank values clear the field and skip format checks
        if let Some(phone) = data.phone.as_deref().filter(|p| !p.trim().is_empty()) {
            if !is_valid_phone(phone) {
                result.add_error("phone", "Phone number may contain only digits, spaces, '+' and '-'");
            }
        }

        if let Some(email) = data.email.as_deref().filter(|e| !e.trim().is_empty()) {
            if !is_valid_email(email) {
                result.add_error("email", "Enter a valid email address");
            }
        }

        if let Some(skills) = &data.skills {
            if skills.len() > MAX_SKILLS_LENGTH {
                result.add_error("skills", "Skills must be 2000 characters or fewer");
            }
        }

        if let Some(dob) = data.date_of_birth.as_deref().filter(|d| !d.trim().is_empty()) {
            validate_date_of_birth(&mut result, dob);
        }

        result
    }
}
