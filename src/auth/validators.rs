use chrono::{NaiveDate, Utc};

use super::models::{Role, SignupRequest};
use crate::common::validation::is_valid_email;
use crate::common::{ValidationResult, Validator};

pub struct SignupValidator;

fn is_username_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-')
}

/// `YYYY-MM-DD`, not in the future
pub fn validate_date_of_birth(result: &mut ValidationResult, value: &str) {
    match NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
        Ok(date) if date > Utc::now().date_naive() => {
            result.add_error("date_of_birth", "Date of birth cannot be in the future");
        }
        Ok(_) => {}
        Err(_) => result.add_error("date_of_birth", "Date of birth must be in YYYY-MM-DD format"),
    }
}

impl Validator<SignupRequest> for SignupValidator {
    fn validate(&self, data: &SignupRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        let username = data.username.trim();
        let length = username.chars().count();
        if length < 3 || length > 150 {
            result.add_error("username", "Username must be between 3 and 150 characters");
        } else if !username.chars().all(is_username_char) {
            result.add_error(
                "username",
                "Username may only contain letters, digits and @/./+/-/_",
            );
        }

        if data.password.chars().count() < 8 {
            result.add_error("password", "Password must be at least 8 characters");
        }

        if !is_valid_email(&data.email) {
            result.add_error("email", "Enter a valid email address");
        }

        if Role::parse(&data.role).is_none() {
            result.add_error("role", "Role must be 'seeker' or 'company'");
        }

        if let Some(dob) = &data.date_of_birth {
            validate_date_of_birth(&mut result, dob);
        }

        result
    }
}
