//! Project moderation under `/admin/projects`.
//!
//! Every endpoint requires [`RequireModerator`]. Decisions are
//! compare-and-set on the stored status: repeating a decision succeeds
//! without writing, reversing one is a conflict, and of two racing
//! opposite decisions exactly one wins.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use capstone_core::error::CoreError;
use capstone_core::event_types::{
    PROJECT_APPROVED as EVENT_APPROVED, PROJECT_DELETED, PROJECT_REJECTED as EVENT_REJECTED,
};
use capstone_core::moderation::{plan_decision, validate_project_status, Decision, Transition};
use capstone_core::notifications::{
    approval_message, rejection_message, KIND_APPROVAL, KIND_REJECTION,
};
use capstone_core::types::DbId;
use capstone_db::models::notification::CreateNotification;
use capstone_db::models::project::{Project, ProjectSummary};
use capstone_db::repositories::ProjectRepo;
use capstone_events::PlatformEvent;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireModerator;
use crate::notifications::dispatch::publish_created;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /admin/projects`.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// `pending` (default), `approved`, `rejected`, or `all`.
    pub status: Option<String>,
}

/// Request body for `POST /admin/projects/{id}/disapprove`.
#[derive(Debug, Deserialize)]
pub struct DisapproveRequest {
    #[serde(default)]
    pub notes: String,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Project",
        id,
    })
}

fn decision_notification(
    project: &Project,
    reviewer_id: DbId,
    decision: &Decision,
) -> CreateNotification {
    let (kind, message) = match decision {
        Decision::Approve => (KIND_APPROVAL, approval_message(&project.title)),
        Decision::Disapprove { notes } => {
            (KIND_REJECTION, rejection_message(&project.title, notes))
        }
    };
    CreateNotification {
        recipient_id: project.user_id,
        sender_id: Some(reviewer_id),
        project_id: Some(project.id),
        kind,
        message,
    }
}

/// Apply `decision` to project `id` and notify its owner in the same
/// transaction.
async fn decide(
    state: &AppState,
    reviewer: &AuthUser,
    id: DbId,
    decision: Decision,
) -> AppResult<Project> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let (from, to) = match plan_decision(&project.status, &decision)? {
        Transition::NoOp => {
            tracing::info!(project_id = id, status = %project.status, "Decision already applied");
            return Ok(project);
        }
        Transition::Apply { from, to } => (from, to),
    };

    let outcome = ProjectRepo::apply_decision(
        &state.pool,
        id,
        from,
        to,
        decision.notes(),
        reviewer.user_id,
        |p| decision_notification(p, reviewer.user_id, &decision),
    )
    .await?;

    let Some(outcome) = outcome else {
        // Someone else moved the project first. Same decision: fine.
        let current = ProjectRepo::find_by_id(&state.pool, id)
            .await?
            .ok_or_else(|| not_found(id))?;
        return match plan_decision(&current.status, &decision)? {
            Transition::NoOp => Ok(current),
            Transition::Apply { .. } => Err(AppError::Core(CoreError::Conflict(
                "Project was modified by another moderator".into(),
            ))),
        };
    };

    tracing::info!(
        project_id = id,
        reviewer_id = reviewer.user_id,
        status = to,
        "Project moderated",
    );

    publish_created(&state.event_bus, &outcome.notification);
    let event_type = match decision {
        Decision::Approve => EVENT_APPROVED,
        Decision::Disapprove { .. } => EVENT_REJECTED,
    };
    state.event_bus.publish(
        PlatformEvent::new(event_type)
            .about("project", id)
            .by(reviewer.user_id),
    );

    Ok(outcome.project)
}

/// GET /api/v1/admin/projects?status=
///
/// The pending queue is oldest first; other lists are newest first.
pub async fn list_projects(
    RequireModerator(_auth): RequireModerator,
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> AppResult<Json<DataResponse<Vec<ProjectSummary>>>> {
    let status = match params.status.as_deref().unwrap_or("pending") {
        "all" => None,
        s => {
            validate_project_status(s).map_err(|e| AppError::Core(CoreError::Validation(e)))?;
            Some(s)
        }
    };
    let projects = ProjectRepo::list_by_status(&state.pool, status).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/admin/projects/{id}
pub async fn get_project(
    RequireModerator(_auth): RequireModerator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectSummary>>> {
    let project = ProjectRepo::find_summary(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: project }))
}

/// POST /api/v1/admin/projects/{id}/approve
pub async fn approve_project(
    RequireModerator(auth): RequireModerator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = decide(&state, &auth, id, Decision::Approve).await?;
    Ok(Json(DataResponse { data: project }))
}

/// POST /api/v1/admin/projects/{id}/disapprove
///
/// Notes are required and are passed on to the owner.
pub async fn disapprove_project(
    RequireModerator(auth): RequireModerator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<DisapproveRequest>,
) -> AppResult<Json<DataResponse<Project>>> {
    let decision = Decision::disapprove(&input.notes)?;
    let project = decide(&state, &auth, id, decision).await?;
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/admin/projects/{id}
///
/// Hard delete. Social rows cascade; notifications stay with the project
/// reference cleared.
pub async fn delete_project(
    RequireModerator(auth): RequireModerator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ProjectRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(project_id = id, reviewer_id = auth.user_id, "Project deleted by moderator");
    state.event_bus.publish(
        PlatformEvent::new(PROJECT_DELETED)
            .about("project", id)
            .by(auth.user_id),
    );

    Ok(StatusCode::NO_CONTENT)
}
