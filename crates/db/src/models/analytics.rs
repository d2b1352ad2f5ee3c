//! Aggregates for the moderator dashboard.

use serde::Serialize;
use sqlx::FromRow;

use crate::models::project::StatusCounts;

/// Platform-wide totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow, Serialize)]
pub struct AnalyticsTotals {
    pub uploads: i64,
    pub users: i64,
    pub bookmarks: i64,
}

/// One dashboard snapshot: totals plus the moderation breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalyticsSnapshot {
    #[serde(flatten)]
    pub totals: AnalyticsTotals,
    pub status_counts: StatusCounts,
}
