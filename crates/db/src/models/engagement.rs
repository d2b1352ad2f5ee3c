//! Likes, bookmarks, and comments.

use capstone_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A comment joined with its author's display fields.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentWithAuthor {
    pub id: DbId,
    pub project_id: DbId,
    pub user_id: DbId,
    pub comment: String,
    pub created_at: Timestamp,
    pub author_name: String,
    pub author_picture_url: Option<String>,
}

/// Result of toggling a like or bookmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToggleOutcome {
    /// Whether the row exists after the toggle.
    pub active: bool,
    /// Count for the project after the toggle.
    pub count: i64,
}
