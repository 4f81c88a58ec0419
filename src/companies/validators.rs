use super::models::{CreateCompanyRequest, UpdateCompanyRequest};
use crate::common::validation::is_http_url;
use crate::common::{ValidationResult, Validator};

pub struct CompanyValidator;

fn check_website(result: &mut ValidationResult, website: &Option<String>) {
    if let Some(website) = website {
        if !website.is_empty() && !is_http_url(website) {
            result.add_error(
                "website",
                "Website must be a valid URL starting with http:// or https://",
            );
        }
    }
}

impl Validator<CreateCompanyRequest> for CompanyValidator {
    fn validate(&self, data: &CreateCompanyRequest) -> ValidationResult {
        let mut result = ValidationResult::new();
        result.require_text("name", "Company name", &data.name, 255);
        check_website(&mut result, &data.website);
        result
    }
}

impl Validator<UpdateCompanyRequest> for CompanyValidator {
    fn validate(&self, data: &UpdateCompanyRequest) -> ValidationResult {
        let mut result = ValidationResult::new();
        if let Some(name) = &data.name {
            result.require_text("name", "Company name", name, 255);
        }
        check_website(&mut result, &data.website);
        result
    }
}
