//! First-administrator bootstrap.
//!
//! Signup never grants `admin`, so the initial account comes from
//! `ADMIN_EMAIL` / `ADMIN_PASSWORD`. Existing accounts are left untouched.

use capstone_core::accounts::ACCOUNT_ACTIVE;
use capstone_core::roles::ROLE_ADMIN;
use capstone_db::models::user::CreateUser;
use capstone_db::repositories::UserRepo;
use capstone_db::DbPool;

use crate::auth::password::hash_password;
use crate::config::AdminBootstrap;
use crate::error::{AppError, AppResult};

/// Create the configured admin if no account uses its email. Returns `true`
/// when an account was created.
pub async fn ensure_admin(pool: &DbPool, admin: &AdminBootstrap) -> AppResult<bool> {
    let email = admin.email.trim().to_lowercase();

    if let Some(existing) = UserRepo::find_by_email(pool, &email).await? {
        if existing.role != ROLE_ADMIN {
            tracing::warn!(
                user_id = existing.id,
                role = %existing.role,
                "ADMIN_EMAIL belongs to a non-admin account; leaving it unchanged",
            );
        }
        return Ok(false);
    }

    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            email,
            password_hash,
            full_name: admin.full_name.clone(),
            role: ROLE_ADMIN.to_string(),
            status: ACCOUNT_ACTIVE.to_string(),
            year_level: None,
            block: None,
            gender: None,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "Bootstrap admin account created");
    Ok(true)
}
