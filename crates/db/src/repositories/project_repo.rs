//! Repository for the `projects` table.

use capstone_core::moderation::{PROJECT_APPROVED, PROJECT_PENDING};
use capstone_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::{CreateNotification, Notification};
use crate::models::project::{CreateProject, Project, ProjectSummary, StatusCounts};
use crate::repositories::{contains_pattern, NotificationRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, title, title_description, abstract_text, source_code_url, \
                       video_url, pdf_url, category, status, admin_notes, reviewed_by, \
                       reviewed_at, created_at, updated_at";

/// Project columns qualified with `p.` plus author fields and counters.
/// Must be used with [`SUMMARY_FROM`].
const SUMMARY_COLUMNS: &str = "p.id, p.user_id, p.title, p.title_description, p.abstract_text, \
     p.source_code_url, p.video_url, p.pdf_url, p.category, p.status, p.admin_notes, \
     p.reviewed_by, p.reviewed_at, p.created_at, p.updated_at, \
     u.full_name AS author_name, \
     u.profile_picture_url AS author_picture_url, \
     u.year_level AS author_year_level, \
     u.block AS author_block, \
     u.gender AS author_gender, \
     (SELECT COUNT(*) FROM project_likes l WHERE l.project_id = p.id) AS like_count, \
     (SELECT COUNT(*) FROM project_comments c WHERE c.project_id = p.id) AS comment_count, \
     (SELECT COUNT(*) FROM project_bookmarks b WHERE b.project_id = p.id) AS bookmark_count";

const SUMMARY_FROM: &str = "projects p JOIN users u ON u.id = p.user_id";

/// A status change together with the notification written in the same
/// transaction.
#[derive(Debug, Clone)]
pub struct DecisionOutcome {
    pub project: Project,
    pub notification: Notification,
}

/// Provides CRUD and moderation operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new submission as `pending`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects
                (user_id, title, title_description, abstract_text, source_code_url,
                 video_url, pdf_url, category, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .bind(input.title.trim())
            .bind(input.title_description.trim())
            .bind(input.abstract_text.trim())
            .bind(input.source_code_url.trim())
            .bind(input.video_url.trim())
            .bind(input.pdf_url.trim())
            .bind(input.category.trim())
            .bind(PROJECT_PENDING)
            .fetch_one(pool)
            .await
    }

    /// Find a project by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a project with its author summary and counters.
    pub async fn find_summary(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProjectSummary>, sqlx::Error> {
        let query = format!("SELECT {SUMMARY_COLUMNS} FROM {SUMMARY_FROM} WHERE p.id = $1");
        sqlx::query_as::<_, ProjectSummary>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List projects in one status, or all projects when `status` is `None`.
    ///
    /// The pending queue is oldest first so reviewers work through it in
    /// submission order; every other listing is newest first.
    pub async fn list_by_status(
        pool: &PgPool,
        status: Option<&str>,
    ) -> Result<Vec<ProjectSummary>, sqlx::Error> {
        match status {
            Some(status) => {
                let order = if status == PROJECT_PENDING {
                    "p.created_at ASC, p.id ASC"
                } else {
                    "p.created_at DESC, p.id DESC"
                };
                let query = format!(
                    "SELECT {SUMMARY_COLUMNS} FROM {SUMMARY_FROM}
                     WHERE p.status = $1
                     ORDER BY {order}"
                );
                sqlx::query_as::<_, ProjectSummary>(&query)
                    .bind(status)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {SUMMARY_COLUMNS} FROM {SUMMARY_FROM}
                     ORDER BY p.created_at DESC, p.id DESC"
                );
                sqlx::query_as::<_, ProjectSummary>(&query)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// Public feed: approved projects, newest first.
    pub async fn feed(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProjectSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM {SUMMARY_FROM}
             WHERE p.status = $1
             ORDER BY p.created_at DESC, p.id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ProjectSummary>(&query)
            .bind(PROJECT_APPROVED)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Approved projects whose title contains `q`, case-insensitively.
    pub async fn search_approved(
        pool: &PgPool,
        q: &str,
    ) -> Result<Vec<ProjectSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM {SUMMARY_FROM}
             WHERE p.status = $1 AND p.title ILIKE $2
             ORDER BY p.created_at DESC, p.id DESC"
        );
        sqlx::query_as::<_, ProjectSummary>(&query)
            .bind(PROJECT_APPROVED)
            .bind(contains_pattern(q))
            .fetch_all(pool)
            .await
    }

    /// Every project owned by `user_id`, in any status, newest first.
    pub async fn list_for_owner(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ProjectSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM {SUMMARY_FROM}
             WHERE p.user_id = $1
             ORDER BY p.created_at DESC, p.id DESC"
        );
        sqlx::query_as::<_, ProjectSummary>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Approved projects bookmarked by `user_id`, most recently bookmarked first.
    pub async fn list_bookmarked(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ProjectSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM {SUMMARY_FROM}
             JOIN project_bookmarks mine ON mine.project_id = p.id AND mine.user_id = $1
             WHERE p.status = $2
             ORDER BY mine.created_at DESC, p.id DESC"
        );
        sqlx::query_as::<_, ProjectSummary>(&query)
            .bind(user_id)
            .bind(PROJECT_APPROVED)
            .fetch_all(pool)
            .await
    }

    /// Apply a moderator decision and insert its notification atomically.
    ///
    /// The update only matches while the row is still in `from`. Returns
    /// `None` when the project is missing or another decision got there
    /// first; the caller reloads to tell the two apart. `notify` builds the
    /// notification from the updated row.
    pub async fn apply_decision<F>(
        pool: &PgPool,
        id: DbId,
        from: &str,
        to: &str,
        notes: Option<&str>,
        reviewer_id: DbId,
        notify: F,
    ) -> Result<Option<DecisionOutcome>, sqlx::Error>
    where
        F: FnOnce(&Project) -> CreateNotification,
    {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE projects SET
                status = $3,
                admin_notes = $4,
                reviewed_by = $5,
                reviewed_at = NOW()
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(from)
            .bind(to)
            .bind(notes)
            .bind(reviewer_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(project) = project else {
            tx.rollback().await?;
            return Ok(None);
        };

        let notification = NotificationRepo::create(&mut *tx, &notify(&project)).await?;
        tx.commit().await?;

        Ok(Some(DecisionOutcome {
            project,
            notification,
        }))
    }

    /// Owner resubmission: replace the submission fields and move a
    /// `from` project back to `to`, clearing the previous review.
    ///
    /// Returns `None` if the project is not owned by `user_id` or is no
    /// longer in `from`.
    pub async fn resubmit(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        from: &str,
        to: &str,
        input: &CreateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                title = $5,
                title_description = $6,
                abstract_text = $7,
                source_code_url = $8,
                video_url = $9,
                pdf_url = $10,
                category = $11,
                status = $4,
                admin_notes = NULL,
                reviewed_by = NULL,
                reviewed_at = NULL
             WHERE id = $1 AND user_id = $2 AND status = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(user_id)
            .bind(from)
            .bind(to)
            .bind(input.title.trim())
            .bind(input.title_description.trim())
            .bind(input.abstract_text.trim())
            .bind(input.source_code_url.trim())
            .bind(input.video_url.trim())
            .bind(input.pdf_url.trim())
            .bind(input.category.trim())
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a project. Likes, bookmarks, and comments cascade;
    /// notifications keep their row with `project_id` cleared.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a project only if `user_id` owns it.
    pub async fn delete_owned(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count projects per moderation status.
    pub async fn status_counts(pool: &PgPool) -> Result<StatusCounts, sqlx::Error> {
        let (pending, approved, rejected): (i64, i64, i64) = sqlx::query_as(
            "SELECT
                COUNT(*) FILTER (WHERE status = 'pending'),
                COUNT(*) FILTER (WHERE status = 'approved'),
                COUNT(*) FILTER (WHERE status = 'rejected')
             FROM projects",
        )
        .fetch_one(pool)
        .await?;
        Ok(StatusCounts {
            pending,
            approved,
            rejected,
        })
    }

    /// The approved project with the most likes. Ties go to the older project.
    pub async fn most_liked_approved(
        pool: &PgPool,
    ) -> Result<Option<ProjectSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM {SUMMARY_FROM}
             WHERE p.status = $1
             ORDER BY like_count DESC, p.created_at ASC, p.id ASC
             LIMIT 1"
        );
        sqlx::query_as::<_, ProjectSummary>(&query)
            .bind(PROJECT_APPROVED)
            .fetch_optional(pool)
            .await
    }
}
