//! Tests for companies module
//!
//! These tests verify core company functionality including:
//! - Company validation
//! - Creation rules (pending start, one per owner, unique names)
//! - Owner-only editing and admin moderation
//! - Visibility of unapproved companies

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::common::test_support::{
        insert_user, json_request, multipart_request, send, test_app, test_pool, test_state, token_for, Fixture,
    };
    use crate::common::{ApiError, Validator};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    fn create_request(name: &str) -> models::CreateCompanyRequest {
        models::CreateCompanyRequest {
            name: name.to_string(),
            description: Some("We build things".to_string()),
            website: Some("https://example.com".to_string()),
            location: Some("Remote".to_string()),
        }
    }

    #[test]
    fn test_create_company_validation() {
        let validator = validators::CompanyValidator;
        assert!(validator.validate(&create_request("Valid Company")).is_valid);

        let result = validator.validate(&create_request("   "));
        assert!(result.has_error("name"));

        let mut request = create_request("Valid");
        request.website = Some("ftp://example.com".to_string());
        assert!(validator.validate(&request).has_error("website"));
    }

    #[test]
    fn test_update_company_validation_allows_partial() {
        let validator = validators::CompanyValidator;
        let request = models::UpdateCompanyRequest::default();
        assert!(validator.validate(&request).is_valid);

        let request = models::UpdateCompanyRequest {
            name: Some("".to_string()),
            ..Default::default()
        };
        assert!(!validator.validate(&request).is_valid);
    }

    #[tokio::test]
    async fn test_new_company_is_pending_and_unique_per_owner() {
        let pool = test_pool().await;
        insert_user(&pool, "U_NEWCO1", "newco", "owner@newco.test", "company").await;
        let service = CompaniesService::new(pool.clone());

        let company = service
            .create_company("U_NEWCO1", create_request("NewCo"))
            .await
            .unwrap();
        assert_eq!(company.status, "pending");
        assert!(!company.is_approved());

        let second = service.create_company("U_NEWCO1", create_request("NewCo Two")).await;
        assert!(matches!(second, Err(ApiError::Conflict(_))));

        assert!(matches!(
            service.require_approved_company("U_NEWCO1").await,
            Err(ApiError::Forbidden(msg)) if msg == services::NOT_APPROVED_MESSAGE
        ));
    }

    #[tokio::test]
    async fn test_duplicate_company_name_conflicts() {
        let pool = test_pool().await;
        Fixture::new(&pool).await;
        insert_user(&pool, "U_NEWCO1", "newco", "owner@newco.test", "company").await;

        let result = CompaniesService::new(pool)
            .create_company("U_NEWCO1", create_request("Acme"))
            .await;
        assert!(matches!(result, Err(ApiError::Conflict(msg)) if msg == "Company name already exists"));
    }

    #[tokio::test]
    async fn test_only_owner_may_edit() {
        let pool = test_pool().await;
        let fixture = Fixture::new(&pool).await;
        let app = test_app(test_state(pool));

        let uri = format!("/api/companies/{}", fixture.company_id);
        let outsider = token_for(&fixture.seeker_id);
        let (status, body) = send(
            &app,
            json_request(Method::PUT, &uri, Some(&outsider), Some(json!({ "name": "Hijacked" }))),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "You are not allowed to edit this company.");

        let owner = token_for(&fixture.company_user_id);
        let (status, body) = send(
            &app,
            json_request(Method::PUT, &uri, Some(&owner), Some(json!({ "location": "Hamburg" }))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["location"], "Hamburg");
        assert_eq!(body["status"], "approved");
    }

    #[tokio::test]
    async fn test_admin_moderation_and_visibility() {
        let pool = test_pool().await;
        let fixture = Fixture::new(&pool).await;
        insert_user(&pool, "U_NEWCO1", "newco", "owner@newco.test", "company").await;
        let app = test_app(test_state(pool));

        let owner = token_for("U_NEWCO1");
        let (status, body) = send(
            &app,
            json_request(Method::POST, "/api/companies", Some(&owner), Some(json!({ "name": "NewCo" }))),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let company_id = body["id"].as_str().unwrap().to_string();

        // Hidden from the public until approved
        let uri = format!("/api/companies/{}", company_id);
        let (status, _) = send(&app, json_request(Method::GET, &uri, None, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, json_request(Method::GET, &uri, Some(&owner), None)).await;
        assert_eq!(status, StatusCode::OK);

        let seeker = token_for(&fixture.seeker_id);
        let approve = format!("/api/admin/companies/{}/approve", company_id);
        let (status, _) = send(&app, json_request(Method::POST, &approve, Some(&seeker), None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let admin = token_for(&fixture.admin_id);
        let (status, body) = send(
            &app,
            json_request(Method::GET, "/api/admin/companies?status=pending", Some(&admin), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, body) = send(&app, json_request(Method::POST, &approve, Some(&admin), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "approved");

        let (status, body) = send(&app, json_request(Method::GET, "/api/companies", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);
    }

    #[tokio::test]
    async fn test_bulk_status_counts_existing_ids() {
        let pool = test_pool().await;
        let fixture = Fixture::new(&pool).await;
        let app = test_app(test_state(pool));

        let admin = token_for(&fixture.admin_id);
        let (status, body) = send(
            &app,
            json_request(
                Method::POST,
                "/api/admin/companies/bulk-status",
                Some(&admin),
                Some(json!({ "ids": [fixture.company_id, "C_MISSING"], "status": "rejected" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["updated"], 1);

        let (status, _) = send(
            &app,
            json_request(
                Method::POST,
                "/api/admin/companies/bulk-status",
                Some(&admin),
                Some(json!({ "ids": [fixture.company_id], "status": "archived" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_logo_upload_requires_image() {
        let pool = test_pool().await;
        let fixture = Fixture::new(&pool).await;
        let app = test_app(test_state(pool));
        let owner = token_for(&fixture.company_user_id);
        let uri = format!("/api/companies/{}/logo", fixture.company_id);

        let (status, _) = send(
            &app,
            multipart_request(&uri, &owner, "logo", "logo.png", b"definitely not an image"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let mut png = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        png.extend_from_slice(&[0u8; 32]);
        let (status, body) = send(&app, multipart_request(&uri, &owner, "logo", "logo.png", &png)).await;
        assert_eq!(status, StatusCode::OK);
        let logo_url = body["logo_url"].as_str().unwrap().to_string();
        assert!(logo_url.starts_with("/api/logos/L_"));

        let (status, _) = send(&app, json_request(Method::GET, &logo_url, None, None)).await;
        assert_eq!(status, StatusCode::OK);
    }
}
