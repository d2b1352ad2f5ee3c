//! Likes, bookmarks, and comments on projects.
//!
//! Likes and bookmarks apply to approved projects only. New likes,
//! bookmarks and comments notify the project owner on a best-effort basis.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use capstone_core::error::CoreError;
use capstone_core::event_types::PROJECT_BOOKMARKED;
use capstone_core::moderation::PROJECT_APPROVED;
use capstone_core::notifications::{
    bookmark_message, comment_message, like_message, KIND_BOOKMARK, KIND_COMMENT, KIND_LIKE,
};
use capstone_core::submission::validate_comment;
use capstone_core::types::DbId;
use capstone_db::models::engagement::CommentWithAuthor;
use capstone_db::models::notification::CreateNotification;
use capstone_db::models::project::Project;
use capstone_db::repositories::{EngagementRepo, ProjectRepo};
use capstone_events::PlatformEvent;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::project::load_visible;
use crate::middleware::rbac::RequireActive;
use crate::notifications::dispatch::notify_best_effort;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /projects/{id}/comments`.
#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub comment: String,
}

/// Result of `POST /projects/{id}/like`.
#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub liked: bool,
    pub like_count: i64,
}

/// Result of `POST /projects/{id}/bookmark`.
#[derive(Debug, Serialize)]
pub struct BookmarkResponse {
    pub bookmarked: bool,
    pub bookmark_count: i64,
}

async fn load_approved(state: &AppState, id: DbId) -> AppResult<Project> {
    ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|p| p.status == PROJECT_APPROVED)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
}

fn owner_notification(
    project: &Project,
    sender_id: DbId,
    kind: &'static str,
    message: String,
) -> CreateNotification {
    CreateNotification {
        recipient_id: project.user_id,
        sender_id: Some(sender_id),
        project_id: Some(project.id),
        kind,
        message,
    }
}

/// POST /api/v1/projects/{id}/like
///
/// Toggle the caller's like.
pub async fn toggle_like(
    RequireActive(auth): RequireActive,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<LikeResponse>>> {
    let project = load_approved(&state, id).await?;
    let outcome = EngagementRepo::toggle_like(&state.pool, id, auth.user_id).await?;

    if outcome.active {
        let message = like_message(&project.title);
        notify_best_effort(
            &state,
            owner_notification(&project, auth.user_id, KIND_LIKE, message),
        )
        .await;
    }

    Ok(Json(DataResponse {
        data: LikeResponse {
            liked: outcome.active,
            like_count: outcome.count,
        },
    }))
}

/// POST /api/v1/projects/{id}/bookmark
///
/// Toggle the caller's bookmark.
pub async fn toggle_bookmark(
    RequireActive(auth): RequireActive,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<BookmarkResponse>>> {
    let project = load_approved(&state, id).await?;
    let outcome = EngagementRepo::toggle_bookmark(&state.pool, id, auth.user_id).await?;

    if outcome.active {
        let message = bookmark_message(&project.title);
        notify_best_effort(
            &state,
            owner_notification(&project, auth.user_id, KIND_BOOKMARK, message),
        )
        .await;
    }
    state.event_bus.publish(
        PlatformEvent::new(PROJECT_BOOKMARKED)
            .about("project", id)
            .by(auth.user_id),
    );

    Ok(Json(DataResponse {
        data: BookmarkResponse {
            bookmarked: outcome.active,
            bookmark_count: outcome.count,
        },
    }))
}

/// GET /api/v1/projects/{id}/comments
///
/// Comments oldest first.
pub async fn list_comments(
    RequireActive(auth): RequireActive,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<CommentWithAuthor>>>> {
    load_visible(&state, id, &auth).await?;
    let comments = EngagementRepo::list_comments(&state.pool, id).await?;
    Ok(Json(DataResponse { data: comments }))
}

/// POST /api/v1/projects/{id}/comments
pub async fn add_comment(
    RequireActive(auth): RequireActive,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CommentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<CommentWithAuthor>>)> {
    let body = validate_comment(&input.comment)?;
    let project = load_approved(&state, id).await?;

    let comment = EngagementRepo::add_comment(&state.pool, id, auth.user_id, &body).await?;
    tracing::debug!(project_id = id, comment_id = comment.id, "Comment added");

    let message = comment_message(&project.title);
    notify_best_effort(
        &state,
        owner_notification(&project, auth.user_id, KIND_COMMENT, message),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}
