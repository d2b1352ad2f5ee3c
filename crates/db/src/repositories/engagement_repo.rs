//! Repository for likes, bookmarks, and comments.

use capstone_core::types::DbId;
use sqlx::PgPool;

use crate::models::engagement::{CommentWithAuthor, ToggleOutcome};

/// Tables that hold one row per (project, user) pair.
#[derive(Debug, Clone, Copy)]
enum ToggleTable {
    Likes,
    Bookmarks,
}

impl ToggleTable {
    fn name(self) -> &'static str {
        match self {
            ToggleTable::Likes => "project_likes",
            ToggleTable::Bookmarks => "project_bookmarks",
        }
    }
}

/// Provides social interactions on projects.
pub struct EngagementRepo;

impl EngagementRepo {
    /// Like the project, or remove the like if it already exists.
    pub async fn toggle_like(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<ToggleOutcome, sqlx::Error> {
        Self::toggle(pool, ToggleTable::Likes, project_id, user_id).await
    }

    /// Bookmark the project, or remove the bookmark if it already exists.
    pub async fn toggle_bookmark(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<ToggleOutcome, sqlx::Error> {
        Self::toggle(pool, ToggleTable::Bookmarks, project_id, user_id).await
    }

    async fn toggle(
        pool: &PgPool,
        table: ToggleTable,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<ToggleOutcome, sqlx::Error> {
        let table = table.name();
        let mut tx = pool.begin().await?;

        let removed = sqlx::query(&format!(
            "DELETE FROM {table} WHERE project_id = $1 AND user_id = $2"
        ))
        .bind(project_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            > 0;

        if !removed {
            sqlx::query(&format!(
                "INSERT INTO {table} (project_id, user_id) VALUES ($1, $2)
                 ON CONFLICT (project_id, user_id) DO NOTHING"
            ))
            .bind(project_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM {table} WHERE project_id = $1"
        ))
        .bind(project_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(ToggleOutcome {
            active: !removed,
            count,
        })
    }

    /// Append a comment, returning it with the author's display fields.
    pub async fn add_comment(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
        comment: &str,
    ) -> Result<CommentWithAuthor, sqlx::Error> {
        sqlx::query_as::<_, CommentWithAuthor>(
            "WITH c AS (
                INSERT INTO project_comments (project_id, user_id, comment)
                VALUES ($1, $2, $3)
                RETURNING id, project_id, user_id, comment, created_at
             )
             SELECT c.id, c.project_id, c.user_id, c.comment, c.created_at,
                    u.full_name AS author_name, u.profile_picture_url AS author_picture_url
             FROM c JOIN users u ON u.id = c.user_id",
        )
        .bind(project_id)
        .bind(user_id)
        .bind(comment)
        .fetch_one(pool)
        .await
    }

    /// Comments on a project, oldest first.
    pub async fn list_comments(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
        sqlx::query_as::<_, CommentWithAuthor>(
            "SELECT c.id, c.project_id, c.user_id, c.comment, c.created_at,
                    u.full_name AS author_name, u.profile_picture_url AS author_picture_url
             FROM project_comments c JOIN users u ON u.id = c.user_id
             WHERE c.project_id = $1
             ORDER BY c.created_at ASC, c.id ASC",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Whether `user_id` has liked and bookmarked the project.
    pub async fn viewer_state(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<(bool, bool), sqlx::Error> {
        sqlx::query_as(
            "SELECT
                EXISTS (SELECT 1 FROM project_likes WHERE project_id = $1 AND user_id = $2),
                EXISTS (SELECT 1 FROM project_bookmarks WHERE project_id = $1 AND user_id = $2)",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}
