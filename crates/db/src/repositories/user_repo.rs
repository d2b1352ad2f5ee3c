//! Repository for the `users` table.

use capstone_core::accounts::{AccountTransition, ACCOUNT_ACTIVE, ACCOUNT_PENDING};
use capstone_core::roles::{ROLE_TEACHER, ROLE_TEACHER_ADMIN};
use capstone_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::{CreateNotification, Notification};
use crate::models::user::{CreateUser, UpdateProfile, User};
use crate::repositories::{contains_pattern, NotificationRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, password_hash, full_name, role, status, year_level, block, \
                       gender, bio, profile_picture_url, created_at, updated_at";

/// A role/status change together with the notification written in the
/// same transaction, if any.
#[derive(Debug, Clone)]
pub struct AccountChange {
    pub user: User,
    pub notification: Option<Notification>,
}

/// Provides CRUD and account-lifecycle operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users
                (email, password_hash, full_name, role, status, year_level, block, gender)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.full_name)
            .bind(&input.role)
            .bind(&input.status)
            .bind(&input.year_level)
            .bind(&input.block)
            .bind(&input.gender)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email. Emails are stored lowercased.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Replace the stored password hash. Returns `false` if the user is gone.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Update profile fields. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                full_name = COALESCE($2, full_name),
                year_level = COALESCE($3, year_level),
                block = COALESCE($4, block),
                gender = COALESCE($5, gender),
                bio = COALESCE($6, bio),
                profile_picture_url = COALESCE($7, profile_picture_url)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.full_name)
            .bind(&input.year_level)
            .bind(&input.block)
            .bind(&input.gender)
            .bind(&input.bio)
            .bind(&input.profile_picture_url)
            .fetch_optional(pool)
            .await
    }

    /// List accounts with the given role, newest first.
    pub async fn list_by_role(pool: &PgPool, role: &str) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE role = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(role)
            .fetch_all(pool)
            .await
    }

    /// List teacher and teacher-admin accounts.
    ///
    /// With `pending_only`, returns the approval queue oldest first;
    /// otherwise every teacher newest first.
    pub async fn list_teachers(pool: &PgPool, pending_only: bool) -> Result<Vec<User>, sqlx::Error> {
        let (filter, order) = if pending_only {
            ("AND status = $3", "created_at ASC, id ASC")
        } else {
            ("", "created_at DESC, id DESC")
        };
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE role IN ($1, $2) {filter}
             ORDER BY {order}"
        );
        let mut q = sqlx::query_as::<_, User>(&query)
            .bind(ROLE_TEACHER)
            .bind(ROLE_TEACHER_ADMIN);
        if pending_only {
            q = q.bind(ACCOUNT_PENDING);
        }
        q.fetch_all(pool).await
    }

    /// Active accounts whose name contains `q`, case-insensitively.
    pub async fn search_by_name(pool: &PgPool, q: &str) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE status = $1 AND full_name ILIKE $2
             ORDER BY full_name ASC, id ASC
             LIMIT 50"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(ACCOUNT_ACTIVE)
            .bind(contains_pattern(q))
            .fetch_all(pool)
            .await
    }

    /// Apply a guarded role/status change and its notification atomically.
    ///
    /// The update only matches while the row still holds the transition's
    /// `from_role` and `from_status`. Returns `None` when the user is
    /// missing or was changed concurrently.
    pub async fn apply_account_transition(
        pool: &PgPool,
        id: DbId,
        transition: &AccountTransition,
        notification: Option<CreateNotification>,
    ) -> Result<Option<AccountChange>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE users SET role = $4, status = $5
             WHERE id = $1 AND role = $2 AND status = $3
             RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(transition.from_role)
            .bind(transition.from_status)
            .bind(transition.to_role)
            .bind(transition.to_status)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(user) = user else {
            tx.rollback().await?;
            return Ok(None);
        };

        let notification = match notification {
            Some(input) => Some(NotificationRepo::create(&mut *tx, &input).await?),
            None => None,
        };
        tx.commit().await?;

        Ok(Some(AccountChange { user, notification }))
    }
}
