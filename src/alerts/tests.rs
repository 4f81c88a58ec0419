//! Tests for alerts module

#[cfg(test)]
mod tests {
    use crate::alerts::services::{alert_message, alert_title, send_job_alerts, AlertRun};
    use crate::common::helpers::parse_timestamp;
    use crate::common::test_support::{
        insert_job, json_request, send, test_app, test_pool, test_state, token_for, Fixture,
    };
    use axum::http::{Method, StatusCode};

    #[test]
    fn test_alert_texts() {
        let skills = vec!["python".to_string(), "django".to_string()];
        assert_eq!(alert_title(1), "🎯 1 New Job Match Your Skills!");
        assert_eq!(alert_title(3), "🎯 3 New Jobs Match Your Skills!");
        assert_eq!(
            alert_message(1, &skills),
            "We found 1 new job that match your skills: python, django"
        );
    }

    #[tokio::test]
    async fn test_alerts_match_recent_jobs_on_first_three_skills() {
        let pool = test_pool().await;
        let fixture = Fixture::new(&pool).await;
        insert_job(&pool, "J_NEW002", &fixture.company_id, "Data Engineer", "data-engineer", "2024-01-01T10:00:00Z").await;
        insert_job(&pool, "J_OLD001", &fixture.company_id, "Old Role", "old-role", "2023-12-30T00:00:00Z").await;
        sqlx::query("UPDATE seeker_profiles SET skills = 'Python, Excel' WHERE user_id = ?")
            .bind(&fixture.other_seeker_id)
            .execute(&pool)
            .await
            .unwrap();

        let now = parse_timestamp("2024-01-01T12:00:00Z").unwrap();
        let run = send_job_alerts(&pool, now).await.unwrap();
        assert_eq!(run, AlertRun { alerts_sent: 1, matched_jobs: 2 });

        let (title, message, link): (String, String, Option<String>) =
            sqlx::query_as("SELECT title, message, link FROM notifications WHERE user_id = ?")
                .bind(&fixture.seeker_id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(title, "🎯 2 New Jobs Match Your Skills!");
        assert_eq!(message, "We found 2 new jobs that match your skills: python, django, sql");
        assert_eq!(link.as_deref(), Some("/"));

        let bob: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = ?")
            .bind(&fixture.other_seeker_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(bob, 0);
    }

    #[tokio::test]
    async fn test_inactive_jobs_are_ignored() {
        let pool = test_pool().await;
        Fixture::new(&pool).await;
        sqlx::query("UPDATE jobs SET is_active = 0")
            .execute(&pool)
            .await
            .unwrap();

        let now = parse_timestamp("2024-01-01T12:00:00Z").unwrap();
        let run = send_job_alerts(&pool, now).await.unwrap();
        assert_eq!(run, AlertRun::default());
    }

    #[tokio::test]
    async fn test_admin_trigger() {
        let pool = test_pool().await;
        let fixture = Fixture::new(&pool).await;
        let app = test_app(test_state(pool));

        let (status, _) = send(
            &app,
            json_request(Method::POST, "/api/admin/job-alerts/run", Some(&token_for(&fixture.seeker_id)), None),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        // Fixture postings are far older than a day
        let (status, body) = send(
            &app,
            json_request(Method::POST, "/api/admin/job-alerts/run", Some(&token_for(&fixture.admin_id)), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["alerts_sent"], 0);
        assert_eq!(body["matched_jobs"], 0);
    }
}
