//! Tests for applications module
//!
//! - Applying, duplicates and re-applying after withdrawal
//! - Status changes, history and notifications
//! - Who may read and change an application
//! - Ranked applicant listing

#[cfg(test)]
mod tests {
    use crate::common::test_support::{
        insert_user, json_request, send, test_app, test_pool, test_state, token_for, Fixture,
    };
    use axum::http::{Method, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use sqlx::SqlitePool;
    use std::time::Duration;

    use crate::applications::ranking::rank_or_unranked;
    use crate::applications::ApplicationsService;
    use crate::auth::{AuthedUser, Role};
    use crate::jobs::Job;
    use crate::matching::{Candidate, MatchReport, Matcher};

    async fn apply(app: &Router, user_id: &str, job_id: &str) -> (StatusCode, Value) {
        send(
            app,
            json_request(
                Method::POST,
                "/api/applications",
                Some(&token_for(user_id)),
                Some(json!({ "job_id": job_id, "cover_letter": "Keen to join." })),
            ),
        )
        .await
    }

    async fn set_status(app: &Router, user_id: &str, application_id: &str, status: &str) -> (StatusCode, Value) {
        let uri = format!("/api/applications/{}/status", application_id);
        send(
            app,
            json_request(Method::PATCH, &uri, Some(&token_for(user_id)), Some(json!({ "status": status }))),
        )
        .await
    }

    async fn count(pool: &SqlitePool, sql: &str, bind: &str) -> i64 {
        sqlx::query_scalar(sql).bind(bind).fetch_one(pool).await.unwrap()
    }

    #[tokio::test]
    async fn test_apply_stores_match_score_and_history() {
        let pool = test_pool().await;
        let fixture = Fixture::new(&pool).await;
        let app = test_app(test_state(pool.clone()));

        let (status, body) = apply(&app, &fixture.seeker_id, &fixture.job_id).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "submitted");
        assert!(body["match_score"].as_i64().unwrap() > 0);
        let id = body["id"].as_str().unwrap().to_string();
        assert!(id.starts_with("A_"));

        let history = count(&pool, "SELECT COUNT(*) FROM application_status_history WHERE application_id = ?", &id).await;
        assert_eq!(history, 1);

        let (status, body) = apply(&app, &fixture.seeker_id, &fixture.job_id).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "You have already applied for this job");

        let (status, _) = apply(&app, &fixture.company_user_id, &fixture.job_id).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_apply_requires_open_job() {
        let pool = test_pool().await;
        let fixture = Fixture::new(&pool).await;
        let app = test_app(test_state(pool.clone()));

        sqlx::query("UPDATE jobs SET application_deadline = '2020-01-01T00:00:00Z' WHERE id = ?")
            .bind(&fixture.job_id)
            .execute(&pool)
            .await
            .unwrap();
        let (status, _) = apply(&app, &fixture.seeker_id, &fixture.job_id).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        sqlx::query("UPDATE jobs SET application_deadline = NULL, is_active = 0 WHERE id = ?")
            .bind(&fixture.job_id)
            .execute(&pool)
            .await
            .unwrap();
        let (status, _) = apply(&app, &fixture.seeker_id, &fixture.job_id).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_withdraw_then_reapply_reuses_row() {
        let pool = test_pool().await;
        let fixture = Fixture::new(&pool).await;
        let app = test_app(test_state(pool.clone()));

        let (_, body) = apply(&app, &fixture.seeker_id, &fixture.job_id).await;
        let id = body["id"].as_str().unwrap().to_string();

        let (status, body) = set_status(&app, &fixture.seeker_id, &id, "withdrawn").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "withdrawn");

        // Withdrawn applications no longer count as applied
        let (_, body) = send(
            &app,
            json_request(Method::GET, "/api/applications/job-ids", Some(&token_for(&fixture.seeker_id)), None),
        )
        .await;
        assert_eq!(body["job_ids"], json!([]));

        let (status, body) = apply(&app, &fixture.seeker_id, &fixture.job_id).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], id.as_str());
        assert_eq!(body["status"], "submitted");

        let rows = count(&pool, "SELECT COUNT(*) FROM applications WHERE user_id = ?", &fixture.seeker_id).await;
        assert_eq!(rows, 1);
        let history = count(&pool, "SELECT COUNT(*) FROM application_status_history WHERE application_id = ?", &id).await;
        assert_eq!(history, 3);

        // The applicant's own changes do not notify them
        let notes = count(&pool, "SELECT COUNT(*) FROM notifications WHERE user_id = ?", &fixture.seeker_id).await;
        assert_eq!(notes, 0);
    }

    #[tokio::test]
    async fn test_company_status_changes_notify_applicant() {
        let pool = test_pool().await;
        let fixture = Fixture::new(&pool).await;
        let app = test_app(test_state(pool.clone()));

        let (_, body) = apply(&app, &fixture.seeker_id, &fixture.job_id).await;
        let id = body["id"].as_str().unwrap().to_string();

        let (status, body) = set_status(&app, &fixture.company_user_id, &id, "reviewed").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "reviewed");

        // Same status again is a no-op
        let (status, _) = set_status(&app, &fixture.company_user_id, &id, "reviewed").await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = set_status(&app, &fixture.company_user_id, &id, "submitted").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = set_status(&app, &fixture.company_user_id, &id, "withdrawn").await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = set_status(&app, &fixture.seeker_id, &id, "accepted").await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = set_status(&app, &fixture.company_user_id, &id, "hired").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, inbox) = send(
            &app,
            json_request(Method::GET, "/api/notifications", Some(&token_for(&fixture.seeker_id)), None),
        )
        .await;
        assert_eq!(inbox["unread_count"], 1);
        let note = &inbox["notifications"][0];
        assert_eq!(note["title"], "Application Status Updated");
        assert_eq!(note["message"], "Your application for 'Backend Engineer' is now 'Reviewed'.");
        assert_eq!(note["link"], "/jobs/backend-engineer-acme");

        let (status, detail) = send(
            &app,
            json_request(
                Method::GET,
                &format!("/api/applications/{}", id),
                Some(&token_for(&fixture.seeker_id)),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["job_title"], "Backend Engineer");
        assert_eq!(detail["company_name"], "Acme");
        let history: Vec<&str> = detail["status_history"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| h["status"].as_str().unwrap())
            .collect();
        assert_eq!(history, vec!["submitted", "reviewed"]);
    }

    #[tokio::test]
    async fn test_reject_and_reopen() {
        let pool = test_pool().await;
        let fixture = Fixture::new(&pool).await;
        let app = test_app(test_state(pool.clone()));

        let (_, body) = apply(&app, &fixture.seeker_id, &fixture.job_id).await;
        let id = body["id"].as_str().unwrap().to_string();
        let reopen_uri = format!("/api/applications/{}/reopen", id);

        let (status, _) = set_status(&app, &fixture.company_user_id, &id, "rejected").await;
        assert_eq!(status, StatusCode::OK);

        // Terminal: only reopen leaves rejected
        let (status, _) = set_status(&app, &fixture.company_user_id, &id, "accepted").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            json_request(Method::POST, &reopen_uri, Some(&token_for(&fixture.seeker_id)), None),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(
            &app,
            json_request(
                Method::POST,
                &reopen_uri,
                Some(&token_for(&fixture.company_user_id)),
                Some(json!({ "notes": "Second look" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "reviewed");

        let (status, _) = set_status(&app, &fixture.company_user_id, &id, "accepted").await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(
            &app,
            json_request(Method::POST, &reopen_uri, Some(&token_for(&fixture.admin_id)), None),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let notes = count(&pool, "SELECT COUNT(*) FROM notifications WHERE user_id = ?", &fixture.seeker_id).await;
        assert_eq!(notes, 3);
    }

    #[tokio::test]
    async fn test_application_privacy() {
        let pool = test_pool().await;
        let fixture = Fixture::new(&pool).await;
        insert_user(&pool, "U_COMP02", "globex_hr", "hr@globex.test", "company").await;
        sqlx::query(
            "INSERT INTO companies (id, owner_id, name, status, created_at, updated_at) VALUES ('C_GLOB01', 'U_COMP02', 'Globex', 'approved', '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
        )
        .execute(&pool)
        .await
        .unwrap();
        let app = test_app(test_state(pool));

        let (_, body) = apply(&app, &fixture.seeker_id, &fixture.job_id).await;
        let uri = format!("/api/applications/{}", body["id"].as_str().unwrap());

        for (viewer, expected) in [
            (fixture.other_seeker_id.as_str(), StatusCode::FORBIDDEN),
            ("U_COMP02", StatusCode::FORBIDDEN),
            (fixture.company_user_id.as_str(), StatusCode::OK),
            (fixture.admin_id.as_str(), StatusCode::OK),
        ] {
            let (status, _) = send(&app, json_request(Method::GET, &uri, Some(&token_for(viewer)), None)).await;
            assert_eq!(status, expected, "viewer {}", viewer);
        }

        let applicants_uri = format!("/api/company/jobs/{}/applications", fixture.job_id);
        let (status, _) = send(
            &app,
            json_request(Method::GET, &applicants_uri, Some(&token_for("U_COMP02")), None),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (_, mine) = send(
            &app,
            json_request(Method::GET, "/api/applications", Some(&token_for(&fixture.other_seeker_id)), None),
        )
        .await;
        assert_eq!(mine, json!([]));
    }

    #[tokio::test]
    async fn test_ranked_applicants() {
        let pool = test_pool().await;
        let fixture = Fixture::new(&pool).await;
        sqlx::query(
            "UPDATE seeker_profiles SET first_name = 'Bob', skills = 'Excel', resume_text = 'Warehouse lead for 3 years' WHERE user_id = ?",
        )
        .bind(&fixture.other_seeker_id)
        .execute(&pool)
        .await
        .unwrap();
        let app = test_app(test_state(pool.clone()));

        // Bob applies first, Alice second
        apply(&app, &fixture.other_seeker_id, &fixture.job_id).await;
        apply(&app, &fixture.seeker_id, &fixture.job_id).await;
        sqlx::query("UPDATE applications SET applied_at = '2024-01-01T00:00:00Z' WHERE user_id = ?")
            .bind(&fixture.other_seeker_id)
            .execute(&pool)
            .await
            .unwrap();

        let company = token_for(&fixture.company_user_id);
        let base = format!("/api/company/jobs/{}/applications", fixture.job_id);

        let (status, body) = send(&app, json_request(Method::GET, &base, Some(&company), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ranked"], false);
        assert_eq!(body["total"], 2);
        let first = &body["applicants"][0];
        assert_eq!(first["applicant"]["username"], "bob");
        assert!(first.get("ranking").is_none());

        let (status, body) = send(
            &app,
            json_request(Method::GET, &format!("{}?ranked=true", base), Some(&company), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ranked"], true);

        let top = &body["applicants"][0];
        assert_eq!(top["applicant"]["username"], "alice");
        assert_eq!(top["applicant"]["name"], "Alice Smith");
        assert_eq!(top["applicant"]["email"], "alice@example.com");
        assert_eq!(top["applicant"]["skills"], json!(["Python", "Django", "SQL"]));
        assert_eq!(top["ranking"]["backend"], "keyword");
        assert_eq!(top["ranking"]["resume_completeness"], 65);
        assert_eq!(top["ranking"]["experience_level"], "entry");
        assert!(top["ranking"]["skills_match"].as_u64().unwrap() > 0);

        let second = &body["applicants"][1];
        assert_eq!(second["applicant"]["username"], "bob");
        assert_eq!(second["ranking"]["experience_level"], "mid");
        assert!(top["ranking"]["score"].as_u64() >= second["ranking"]["score"].as_u64());
    }

    struct StalledMatcher;

    #[async_trait::async_trait]
    impl Matcher for StalledMatcher {
        async fn score(&self, _candidate: &Candidate, _job: &Job) -> MatchReport {
            tokio::time::sleep(Duration::from_secs(5)).await;
            MatchReport {
                score: 100,
                matched_skills: vec![],
                missing_skills: vec![],
                backend: "stalled".to_string(),
                summary: None,
            }
        }

        fn backend_name(&self) -> &'static str {
            "stalled"
        }
    }

    #[tokio::test]
    async fn test_ranking_timeout_falls_back_to_applied_order() {
        let pool = test_pool().await;
        let fixture = Fixture::new(&pool).await;
        let app = test_app(test_state(pool.clone()));

        apply(&app, &fixture.other_seeker_id, &fixture.job_id).await;
        apply(&app, &fixture.seeker_id, &fixture.job_id).await;
        sqlx::query("UPDATE applications SET applied_at = '2024-01-01T00:00:00Z' WHERE user_id = ?")
            .bind(&fixture.other_seeker_id)
            .execute(&pool)
            .await
            .unwrap();

        let admin = AuthedUser {
            id: fixture.admin_id.clone(),
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            role: Role::Seeker,
            is_admin: true,
        };
        let (job, rows) = ApplicationsService::new(pool.clone())
            .list_for_job(&admin, &fixture.job_id)
            .await
            .unwrap();

        let entries = rank_or_unranked(&StalledMatcher, &job, &rows, Duration::from_millis(50)).await;
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|entry| entry.ranking.is_none()));
        assert_eq!(entries[0].user_id, fixture.other_seeker_id);
        assert_eq!(entries[1].user_id, fixture.seeker_id);
    }
}
