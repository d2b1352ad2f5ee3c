//! Handlers for the `/projects` resource: submission, feed, search,
//! detail, and the owner's own projects.
//!
//! Every endpoint requires an active account.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use capstone_core::error::CoreError;
use capstone_core::event_types::{PROJECT_DELETED, PROJECT_RESUBMITTED, PROJECT_SUBMITTED};
use capstone_core::moderation::{plan_resubmission, Transition, PROJECT_APPROVED};
use capstone_core::roles::is_moderator;
use capstone_core::submission::{validate_project_draft, ProjectDraft};
use capstone_core::types::DbId;
use capstone_db::models::project::{CreateProject, Project, ProjectSummary};
use capstone_db::repositories::{EngagementRepo, ProjectRepo};
use capstone_events::PlatformEvent;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireActive;
use crate::response::DataResponse;
use crate::state::AppState;

/// Default page size for the approved feed.
const DEFAULT_FEED_LIMIT: i64 = 20;

/// Maximum page size for the approved feed.
const MAX_FEED_LIMIT: i64 = 100;

// ---------------------------------------------------------------------------
// Query / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /projects`.
#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for `GET /projects/search`.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// A project as seen by one viewer.
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub summary: ProjectSummary,
    pub liked: bool,
    pub bookmarked: bool,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn draft_of(input: &CreateProject) -> ProjectDraft<'_> {
    ProjectDraft {
        title: &input.title,
        title_description: &input.title_description,
        abstract_text: &input.abstract_text,
        source_code_url: &input.source_code_url,
        video_url: &input.video_url,
        pdf_url: &input.pdf_url,
        category: &input.category,
    }
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Project",
        id,
    })
}

/// Whether `viewer` may see `project`. Approved projects are public; the
/// rest are visible to their owner and to moderators only.
pub(crate) fn can_view(project: &Project, viewer: &AuthUser) -> bool {
    project.status == PROJECT_APPROVED
        || project.user_id == viewer.user_id
        || is_moderator(&viewer.role)
}

/// Load a project `viewer` may see. Hidden projects report as not found.
pub(crate) async fn load_visible(
    state: &AppState,
    id: DbId,
    viewer: &AuthUser,
) -> AppResult<Project> {
    match ProjectRepo::find_by_id(&state.pool, id).await? {
        Some(project) if can_view(&project, viewer) => Ok(project),
        _ => Err(not_found(id)),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/projects
///
/// Approved projects, newest first.
pub async fn list_feed(
    RequireActive(_auth): RequireActive,
    State(state): State<AppState>,
    Query(params): Query<FeedQuery>,
) -> AppResult<Json<DataResponse<Vec<ProjectSummary>>>> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_FEED_LIMIT)
        .clamp(1, MAX_FEED_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let projects = ProjectRepo::feed(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// POST /api/v1/projects
///
/// Submit a project for review. It stays out of the feed until approved.
pub async fn submit_project(
    RequireActive(auth): RequireActive,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    validate_project_draft(&draft_of(&input))?;

    let project = ProjectRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(project_id = project.id, user_id = auth.user_id, "Project submitted");
    state.event_bus.publish(
        PlatformEvent::new(PROJECT_SUBMITTED)
            .about("project", project.id)
            .by(auth.user_id),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects/search?q=
///
/// Approved projects whose title contains `q`, case-insensitively.
pub async fn search_projects(
    RequireActive(_auth): RequireActive,
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<DataResponse<Vec<ProjectSummary>>>> {
    let q = params.q.trim();
    if q.is_empty() {
        return Ok(Json(DataResponse { data: Vec::new() }));
    }
    let projects = ProjectRepo::search_approved(&state.pool, q).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/mine
///
/// The caller's projects in every status, with admin notes on rejected ones.
pub async fn list_own_projects(
    RequireActive(auth): RequireActive,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ProjectSummary>>>> {
    let projects = ProjectRepo::list_for_owner(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/bookmarked
pub async fn list_bookmarked(
    RequireActive(auth): RequireActive,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ProjectSummary>>>> {
    let projects = ProjectRepo::list_bookmarked(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{id}
///
/// Project detail with the caller's like and bookmark state.
pub async fn get_project(
    RequireActive(auth): RequireActive,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectDetail>>> {
    let summary = ProjectRepo::find_summary(&state.pool, id)
        .await?
        .filter(|s| can_view(&s.project, &auth))
        .ok_or_else(|| not_found(id))?;

    let (liked, bookmarked) = EngagementRepo::viewer_state(&state.pool, id, auth.user_id).await?;

    Ok(Json(DataResponse {
        data: ProjectDetail {
            summary,
            liked,
            bookmarked,
        },
    }))
}

/// DELETE /api/v1/projects/{id}
///
/// Delete one of the caller's own projects. Returns 204 No Content.
pub async fn delete_own_project(
    RequireActive(auth): RequireActive,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ProjectRepo::delete_owned(&state.pool, id, auth.user_id).await? {
        return Err(not_found(id));
    }

    tracing::info!(project_id = id, user_id = auth.user_id, "Project deleted by owner");
    state.event_bus.publish(
        PlatformEvent::new(PROJECT_DELETED)
            .about("project", id)
            .by(auth.user_id),
    );

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/projects/{id}/resubmit
///
/// Replace the fields of a disapproved project and send it back for review.
pub async fn resubmit_project(
    RequireActive(auth): RequireActive,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    validate_project_draft(&draft_of(&input))?;

    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|p| p.user_id == auth.user_id)
        .ok_or_else(|| not_found(id))?;

    let Transition::Apply { from, to } = plan_resubmission(&project.status)? else {
        return Ok(Json(DataResponse { data: project }));
    };

    let project = ProjectRepo::resubmit(&state.pool, id, auth.user_id, from, to, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Project was modified while resubmitting".into(),
            ))
        })?;

    tracing::info!(project_id = id, user_id = auth.user_id, "Project resubmitted");
    state.event_bus.publish(
        PlatformEvent::new(PROJECT_RESUBMITTED)
            .about("project", id)
            .by(auth.user_id),
    );

    Ok(Json(DataResponse { data: project }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(user_id: DbId, status: &str) -> Project {
        let now = chrono::Utc::now();
        Project {
            id: 1,
            user_id,
            title: "Rover".into(),
            title_description: "Line-following robot".into(),
            abstract_text: "A".repeat(60),
            source_code_url: "https://github.com/example/rover".into(),
            video_url: "https://youtu.be/rover".into(),
            pdf_url: "https://cdn.example.com/rover.pdf".into(),
            category: "Robotics".into(),
            status: status.into(),
            admin_notes: None,
            reviewed_by: None,
            reviewed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn viewer(user_id: DbId, role: &str) -> AuthUser {
        AuthUser {
            user_id,
            role: role.into(),
        }
    }

    #[test]
    fn approved_projects_are_public() {
        assert!(can_view(&project(1, "approved"), &viewer(2, "user")));
    }

    #[test]
    fn pending_projects_are_visible_to_owner_and_moderators() {
        let p = project(1, "pending");
        assert!(can_view(&p, &viewer(1, "user")));
        assert!(can_view(&p, &viewer(9, "admin")));
        assert!(can_view(&p, &viewer(9, "teacher_admin")));
        assert!(!can_view(&p, &viewer(2, "user")));
        assert!(!can_view(&p, &viewer(2, "teacher")));
    }
}
