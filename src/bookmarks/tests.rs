//! Tests for bookmarks module

#[cfg(test)]
mod tests {
    use crate::common::test_support::{
        insert_job, json_request, send, test_app, test_pool, test_state, token_for, Fixture,
    };
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn test_toggle_adds_then_removes() {
        let pool = test_pool().await;
        let fixture = Fixture::new(&pool).await;
        let app = test_app(test_state(pool));
        let token = token_for(&fixture.seeker_id);
        let toggle = format!("/api/bookmarks/{}/toggle", fixture.job_id);
        let check = format!("/api/bookmarks/{}", fixture.job_id);

        let (status, body) = send(&app, json_request(Method::POST, &toggle, Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["bookmarked"], true);
        assert_eq!(body["message"], "Job \"Backend Engineer\" bookmarked successfully!");
        assert_eq!(body["message_type"], "success");

        let (_, body) = send(&app, json_request(Method::GET, &check, Some(&token), None)).await;
        assert_eq!(body["bookmarked"], true);

        let (_, body) = send(&app, json_request(Method::POST, &toggle, Some(&token), None)).await;
        assert_eq!(body["bookmarked"], false);
        assert_eq!(body["message"], "Job \"Backend Engineer\" removed from bookmarks!");

        let (_, body) = send(&app, json_request(Method::GET, &check, Some(&token), None)).await;
        assert_eq!(body["bookmarked"], false);
    }

    #[tokio::test]
    async fn test_toggle_inactive_job_is_not_found() {
        let pool = test_pool().await;
        let fixture = Fixture::new(&pool).await;
        sqlx::query("UPDATE jobs SET is_active = 0 WHERE id = ?")
            .bind(&fixture.job_id)
            .execute(&pool)
            .await
            .unwrap();
        let app = test_app(test_state(pool));

        let (status, _) = send(
            &app,
            json_request(
                Method::POST,
                &format!("/api/bookmarks/{}/toggle", fixture.job_id),
                Some(&token_for(&fixture.seeker_id)),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_paginated() {
        let pool = test_pool().await;
        let fixture = Fixture::new(&pool).await;
        for i in 0..11 {
            let id = format!("J_EXTRA{:02}", i);
            insert_job(&pool, &id, &fixture.company_id, &format!("Role {}", i), &format!("role-{}", i), "2024-03-01T00:00:00Z").await;
            sqlx::query("INSERT INTO bookmarks (id, user_id, job_id, created_at) VALUES (?, ?, ?, ?)")
                .bind(format!("B_{:06}", i))
                .bind(&fixture.seeker_id)
                .bind(&id)
                .bind(format!("2024-03-{:02}T00:00:00Z", i + 1))
                .execute(&pool)
                .await
                .unwrap();
        }
        let app = test_app(test_state(pool));
        let token = token_for(&fixture.seeker_id);

        let (status, body) = send(&app, json_request(Method::GET, "/api/bookmarks", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 11);
        assert_eq!(body["total_pages"], 2);
        let items = body["items"].as_array().unwrap();
        assert_eq!(items.len(), 10);
        assert_eq!(items[0]["job"]["title"], "Role 10");
        assert_eq!(items[0]["job"]["company_name"], "Acme");

        let (_, body) = send(&app, json_request(Method::GET, "/api/bookmarks?page=2", Some(&token), None)).await;
        assert_eq!(body["items"].as_array().unwrap().len(), 1);
        assert_eq!(body["items"][0]["job"]["title"], "Role 0");

        let (_, body) = send(
            &app,
            json_request(Method::GET, "/api/bookmarks", Some(&token_for(&fixture.other_seeker_id)), None),
        )
        .await;
        assert_eq!(body["total"], 0);
    }
}
