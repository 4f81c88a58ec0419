// src/notifications/models.rs

use serde::Serialize;
use sqlx::FromRow;

use crate::common::helpers::parse_timestamp;

#[derive(Debug, Clone, FromRow)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: String,
}

/// Inbox entry with a display timestamp (`%Y-%m-%d %H:%M`)
#[derive(Debug, Clone, Serialize)]
pub struct NotificationItem {
    pub id: String,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: String,
}

impl From<Notification> for NotificationItem {
    fn from(n: Notification) -> Self {
        let created_at = parse_timestamp(&n.created_at)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or(n.created_at);

        Self {
            id: n.id,
            title: n.title,
            message: n.message,
            link: n.link,
            is_read: n.is_read,
            created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NotificationInbox {
    pub notifications: Vec<NotificationItem>,
    pub unread_count: i64,
}
