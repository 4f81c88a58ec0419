// Field-level validation shared by every request validator

use regex::Regex;
use std::sync::OnceLock;

use super::helpers::cached_regex;

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

#[derive(Debug)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.is_valid = false;
        self.errors.push(ValidationError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn merge(&mut self, other: ValidationResult) {
        if !other.is_valid {
            self.is_valid = false;
            self.errors.extend(other.errors);
        }
    }

    /// Records `"{label} is required"` when the value is blank, and a length
    /// error when it exceeds `max` characters.
    pub fn require_text(&mut self, field: &str, label: &str, value: &str, max: usize) {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.add_error(field, &format!("{} is required", label));
        } else if trimmed.chars().count() > max {
            self.add_error(
                field,
                &format!("{} must be less than {} characters", label, max),
            );
        }
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Converts into a `Result` so validators can be chained with `?`.
    pub fn into_result(self) -> Result<(), super::ApiError> {
        if self.is_valid {
            Ok(())
        } else {
            Err(self.into())
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

pub trait Validator<T> {
    fn validate(&self, data: &T) -> ValidationResult;
}

static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();

pub fn is_valid_email(email: &str) -> bool {
    cached_regex(&EMAIL, r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$")
        .is_some_and(|re| re.is_match(email.trim()))
}

/// A phone number is valid when, after dropping `+`, `-` and spaces, what
/// remains is a non-empty run of ASCII digits.
pub fn is_valid_phone(phone: &str) -> bool {
    let digits: String = phone
        .chars()
        .filter(|c| !matches!(c, '+' | '-' | ' '))
        .collect();
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

pub fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
