//! Aggregate queries for the moderator dashboard.

use sqlx::PgPool;

use crate::models::analytics::{AnalyticsSnapshot, AnalyticsTotals};
use crate::repositories::ProjectRepo;

/// Read-only dashboard aggregates.
pub struct AnalyticsRepo;

impl AnalyticsRepo {
    /// Total uploads (all statuses), `user`-role accounts, and bookmarks.
    pub async fn totals(pool: &PgPool) -> Result<AnalyticsTotals, sqlx::Error> {
        sqlx::query_as::<_, AnalyticsTotals>(
            "SELECT
                (SELECT COUNT(*) FROM projects) AS uploads,
                (SELECT COUNT(*) FROM users WHERE role = 'user') AS users,
                (SELECT COUNT(*) FROM project_bookmarks) AS bookmarks",
        )
        .fetch_one(pool)
        .await
    }

    /// Totals plus the per-status project breakdown.
    pub async fn snapshot(pool: &PgPool) -> Result<AnalyticsSnapshot, sqlx::Error> {
        let totals = Self::totals(pool).await?;
        let status_counts = ProjectRepo::status_counts(pool).await?;
        Ok(AnalyticsSnapshot {
            totals,
            status_counts,
        })
    }
}
