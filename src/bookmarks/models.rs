// src/bookmarks/models.rs

use serde::Serialize;
use sqlx::FromRow;

use crate::jobs::{Job, JobView};

#[derive(Debug, Clone, FromRow)]
pub struct BookmarkRow {
    pub bookmark_id: String,
    pub bookmarked_at: String,
    #[sqlx(flatten)]
    pub job: Job,
}

#[derive(Debug, Serialize)]
pub struct BookmarkedJob {
    pub bookmark_id: String,
    pub bookmarked_at: String,
    pub job: JobView,
}

impl From<BookmarkRow> for BookmarkedJob {
    fn from(row: BookmarkRow) -> Self {
        Self {
            bookmark_id: row.bookmark_id,
            bookmarked_at: row.bookmarked_at,
            job: JobView::from(row.job),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub bookmarked: bool,
    pub message: String,
    pub message_type: &'static str,
}
