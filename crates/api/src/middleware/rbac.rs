//! Role and account-status gates.
//!
//! Both extractors load the caller's row on every request, so an approval,
//! rejection, promotion or demotion applies from the next request on,
//! whatever the token says.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use capstone_core::accounts::ACCOUNT_ACTIVE;
use capstone_core::error::CoreError;
use capstone_core::roles::is_moderator;
use capstone_db::models::user::User;
use capstone_db::repositories::UserRepo;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

async fn load_active(parts: &mut Parts, state: &AppState) -> Result<User, AppError> {
    let auth = AuthUser::from_request_parts(parts, state).await?;

    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Account no longer exists".into())))?;

    if user.status != ACCOUNT_ACTIVE {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Account is {}",
            user.status
        ))));
    }
    Ok(user)
}

/// Requires an existing, active account. `role` reflects the stored row.
///
/// ```ignore
/// async fn submit(RequireActive(user): RequireActive) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireActive(pub AuthUser);

impl FromRequestParts<AppState> for RequireActive {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = load_active(parts, state).await?;
        Ok(RequireActive(AuthUser {
            user_id: user.id,
            role: user.role,
        }))
    }
}

/// Requires an active `admin` or `teacher_admin`. Rejects with 403 otherwise.
pub struct RequireModerator(pub AuthUser);

impl FromRequestParts<AppState> for RequireModerator {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = load_active(parts, state).await?;
        if !is_moderator(&user.role) {
            tracing::debug!(user_id = user.id, role = %user.role, "Moderator access denied");
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin or teacher admin role required".into(),
            )));
        }
        Ok(RequireModerator(AuthUser {
            user_id: user.id,
            role: user.role,
        }))
    }
}
