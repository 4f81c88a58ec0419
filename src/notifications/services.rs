// src/notifications/services.rs

use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;

use super::models::{Notification, NotificationInbox, NotificationItem};
use crate::common::{generate_id, now_timestamp, ApiError, EntityPrefix};

const INBOX_SIZE: i64 = 10;

/// Inserts an unread notification through any executor, so callers can
/// write it inside their own transaction. Returns the new id.
pub async fn insert_notification<'e, E>(
    executor: E,
    user_id: &str,
    title: &str,
    message: &str,
    link: Option<&str>,
) -> Result<String, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let id = generate_id(EntityPrefix::Notification);

    sqlx::query(
        "INSERT INTO notifications (id, user_id, title, message, link, is_read, created_at) VALUES (?, ?, ?, ?, ?, 0, ?)",
    )
    .bind(&id)
    .bind(user_id)
    .bind(title)
    .bind(message)
    .bind(link)
    .bind(now_timestamp())
    .execute(executor)
    .await?;

    Ok(id)
}

pub struct NotificationService {
    db: SqlitePool,
}

impl NotificationService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Stores one unread notification and returns its id.
    pub async fn notify(
        &self,
        user_id: &str,
        title: &str,
        message: &str,
        link: Option<&str>,
    ) -> Result<String, ApiError> {
        let id = insert_notification(&self.db, user_id, title, message, link).await?;

        debug!(user_id = %user_id, notification_id = %id, "Notification stored");
        Ok(id)
    }

    /// Latest notifications plus the total unread count.
    pub async fn inbox(&self, user_id: &str) -> Result<NotificationInbox, ApiError> {
        let rows = sqlx::query_as::<_, Notification>(
            "SELECT id, user_id, title, message, link, is_read, created_at FROM notifications WHERE user_id = ? ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(INBOX_SIZE)
        .fetch_all(&self.db)
        .await?;

        let unread_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = ? AND is_read = 0",
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(NotificationInbox {
            notifications: rows.into_iter().map(NotificationItem::from).collect(),
            unread_count,
        })
    }

    pub async fn mark_read(&self, user_id: &str, notification_id: &str) -> Result<(), ApiError> {
        let result = sqlx::query("UPDATE notifications SET is_read = 1 WHERE id = ? AND user_id = ?")
            .bind(notification_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Notification not found".to_string()));
        }
        Ok(())
    }

    pub async fn mark_all_read(&self, user_id: &str) -> Result<u64, ApiError> {
        let result = sqlx::query("UPDATE notifications SET is_read = 1 WHERE user_id = ? AND is_read = 0")
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected())
    }
}
