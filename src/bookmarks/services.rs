// src/bookmarks/services.rs

use sqlx::SqlitePool;
use tracing::info;

use super::models::{BookmarkRow, BookmarkedJob, ToggleResponse};
use crate::common::{generate_id, now_timestamp, ApiError, EntityPrefix, Page, Pagination};
use crate::jobs::services::listings::JOB_SELECT;
use crate::jobs::JobsService;

pub struct BookmarksService {
    db: SqlitePool,
}

impl BookmarksService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn is_bookmarked(&self, user_id: &str, job_id: &str) -> Result<bool, ApiError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM bookmarks WHERE user_id = ? AND job_id = ?",
        )
        .bind(user_id)
        .bind(job_id)
        .fetch_one(&self.db)
        .await?;
        Ok(count > 0)
    }

    /// Adds the bookmark when absent, removes it otherwise. Only visible jobs
    /// can be toggled.
    pub async fn toggle(&self, user_id: &str, job_id: &str) -> Result<ToggleResponse, ApiError> {
        let job = JobsService::new(self.db.clone()).get_visible_job(job_id).await?;

        let removed = sqlx::query("DELETE FROM bookmarks WHERE user_id = ? AND job_id = ?")
            .bind(user_id)
            .bind(&job.id)
            .execute(&self.db)
            .await?
            .rows_affected()
            > 0;

        if removed {
            info!(user_id = %user_id, job_id = %job.id, "Bookmark removed");
            return Ok(ToggleResponse {
                bookmarked: false,
                message: format!("Job \"{}\" removed from bookmarks!", job.title),
                message_type: "success",
            });
        }

        sqlx::query(
            "INSERT INTO bookmarks (id, user_id, job_id, created_at) VALUES (?, ?, ?, ?) ON CONFLICT(user_id, job_id) DO NOTHING",
        )
        .bind(generate_id(EntityPrefix::Bookmark))
        .bind(user_id)
        .bind(&job.id)
        .bind(now_timestamp())
        .execute(&self.db)
        .await?;

        info!(user_id = %user_id, job_id = %job.id, "Bookmark added");
        Ok(ToggleResponse {
            bookmarked: true,
            message: format!("Job \"{}\" bookmarked successfully!", job.title),
            message_type: "success",
        })
    }

    /// Bookmarked active jobs, newest bookmark first.
    pub async fn list(&self, user_id: &str, pagination: Pagination) -> Result<Page<BookmarkedJob>, ApiError> {
        let rows = sqlx::query_as::<_, BookmarkRow>(&format!(
            r#"
            SELECT b.id AS bookmark_id, b.created_at AS bookmarked_at, v.*
            FROM bookmarks b
            JOIN ({}) v ON v.id = b.job_id
            WHERE b.user_id = ? AND v.is_active = 1
            ORDER BY b.created_at DESC, b.rowid DESC
            LIMIT ? OFFSET ?
            "#,
            JOB_SELECT
        ))
        .bind(user_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM bookmarks b JOIN jobs j ON j.id = b.job_id WHERE b.user_id = ? AND j.is_active = 1",
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        let items = rows.into_iter().map(BookmarkedJob::from).collect();
        Ok(Page::new(items, total, pagination))
    }
}
