//! Project submission models and DTOs.

use capstone_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub title_description: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub source_code_url: String,
    pub video_url: String,
    pub pdf_url: String,
    pub category: String,
    pub status: String,
    pub admin_notes: Option<String>,
    pub reviewed_by: Option<DbId>,
    pub reviewed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A project joined with its author and engagement counters.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub project: Project,
    pub author_name: String,
    pub author_picture_url: Option<String>,
    pub author_year_level: Option<String>,
    pub author_block: Option<String>,
    pub author_gender: Option<String>,
    pub like_count: i64,
    pub comment_count: i64,
    pub bookmark_count: i64,
}

/// DTO for a new submission. Always inserted as `pending`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub title: String,
    pub title_description: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub source_code_url: String,
    pub video_url: String,
    pub pdf_url: String,
    pub category: String,
}

/// Projects bucketed by moderation status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
}
