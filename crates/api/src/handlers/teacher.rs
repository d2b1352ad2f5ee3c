//! Account administration under `/admin/users` and `/admin/teachers`.
//!
//! Teacher actions are guarded updates on the stored role and status; the
//! approve/reject notification is written in the same transaction. A
//! moderator cannot act on their own account.

use axum::extract::{Path, Query, State};
use axum::Json;
use capstone_core::accounts::{plan_teacher_action, TeacherAction};
use capstone_core::error::CoreError;
use capstone_core::event_types::{
    TEACHER_APPROVED, TEACHER_DEMOTED, TEACHER_PROMOTED, TEACHER_REJECTED,
};
use capstone_core::notifications::{
    teacher_approved_message, teacher_rejected_message, KIND_TEACHER_APPROVED,
    KIND_TEACHER_REJECTED,
};
use capstone_core::roles::ROLE_USER;
use capstone_core::types::DbId;
use capstone_db::models::notification::CreateNotification;
use capstone_db::models::user::UserProfile;
use capstone_db::repositories::UserRepo;
use capstone_events::PlatformEvent;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireModerator;
use crate::notifications::dispatch::publish_created;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /admin/teachers`.
#[derive(Debug, Deserialize)]
pub struct TeacherQuery {
    /// `pending` for the approval queue; `all` or absent lists every teacher.
    pub status: Option<String>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "User", id })
}

fn action_notification(
    action: TeacherAction,
    teacher_id: DbId,
    actor_id: DbId,
) -> Option<CreateNotification> {
    let (kind, message) = match action {
        TeacherAction::Approve => (KIND_TEACHER_APPROVED, teacher_approved_message()),
        TeacherAction::Reject => (KIND_TEACHER_REJECTED, teacher_rejected_message()),
        TeacherAction::Promote | TeacherAction::Demote => return None,
    };
    Some(CreateNotification {
        recipient_id: teacher_id,
        sender_id: Some(actor_id),
        project_id: None,
        kind,
        message,
    })
}

fn action_event(action: TeacherAction) -> &'static str {
    match action {
        TeacherAction::Approve => TEACHER_APPROVED,
        TeacherAction::Reject => TEACHER_REJECTED,
        TeacherAction::Promote => TEACHER_PROMOTED,
        TeacherAction::Demote => TEACHER_DEMOTED,
    }
}

async fn apply_teacher_action(
    state: &AppState,
    actor: &AuthUser,
    id: DbId,
    action: TeacherAction,
) -> AppResult<UserProfile> {
    if id == actor.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You cannot change your own account".into(),
        )));
    }

    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let transition = plan_teacher_action(action, &user.role, &user.status)?;
    let notification = action_notification(action, id, actor.user_id);

    let change =
        UserRepo::apply_account_transition(&state.pool, id, &transition, notification).await?;

    let Some(change) = change else {
        // Lost a race: re-plan against the current row for the right error.
        let current = UserRepo::find_by_id(&state.pool, id)
            .await?
            .ok_or_else(|| not_found(id))?;
        plan_teacher_action(action, &current.role, &current.status)?;
        return Err(AppError::Core(CoreError::Conflict(
            "Account was modified by another moderator".into(),
        )));
    };

    tracing::info!(
        user_id = id,
        actor_id = actor.user_id,
        action = action.as_str(),
        role = %change.user.role,
        status = %change.user.status,
        "Teacher account updated",
    );

    if let Some(notification) = &change.notification {
        publish_created(&state.event_bus, notification);
    }
    state.event_bus.publish(
        PlatformEvent::new(action_event(action))
            .about("user", id)
            .by(actor.user_id),
    );

    Ok(change.user.into())
}

/// GET /api/v1/admin/users
///
/// Accounts with the `user` role, newest first.
pub async fn list_users(
    RequireModerator(_auth): RequireModerator,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UserProfile>>>> {
    let users = UserRepo::list_by_role(&state.pool, ROLE_USER).await?;
    Ok(Json(DataResponse {
        data: users.into_iter().map(UserProfile::from).collect(),
    }))
}

/// GET /api/v1/admin/teachers?status=pending
pub async fn list_teachers(
    RequireModerator(_auth): RequireModerator,
    State(state): State<AppState>,
    Query(params): Query<TeacherQuery>,
) -> AppResult<Json<DataResponse<Vec<UserProfile>>>> {
    let pending_only = match params.status.as_deref() {
        None | Some("all") => false,
        Some("pending") => true,
        Some(other) => {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown teacher status filter '{other}'; use 'pending' or 'all'"
            ))));
        }
    };
    let teachers = UserRepo::list_teachers(&state.pool, pending_only).await?;
    Ok(Json(DataResponse {
        data: teachers.into_iter().map(UserProfile::from).collect(),
    }))
}

/// POST /api/v1/admin/teachers/{id}/approve
pub async fn approve_teacher(
    RequireModerator(auth): RequireModerator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    let user = apply_teacher_action(&state, &auth, id, TeacherAction::Approve).await?;
    Ok(Json(DataResponse { data: user }))
}

/// POST /api/v1/admin/teachers/{id}/reject
pub async fn reject_teacher(
    RequireModerator(auth): RequireModerator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    let user = apply_teacher_action(&state, &auth, id, TeacherAction::Reject).await?;
    Ok(Json(DataResponse { data: user }))
}

/// POST /api/v1/admin/teachers/{id}/promote
///
/// Make an active teacher a teacher admin.
pub async fn promote_teacher(
    RequireModerator(auth): RequireModerator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    let user = apply_teacher_action(&state, &auth, id, TeacherAction::Promote).await?;
    Ok(Json(DataResponse { data: user }))
}

/// POST /api/v1/admin/teachers/{id}/demote
pub async fn demote_teacher(
    RequireModerator(auth): RequireModerator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    let user = apply_teacher_action(&state, &auth, id, TeacherAction::Demote).await?;
    Ok(Json(DataResponse { data: user }))
}
