//! Handlers for the `/notifications` resource.
//!
//! All endpoints act on the caller's own notifications.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use capstone_core::error::CoreError;
use capstone_core::notifications::{clamp_limit, clamp_offset};
use capstone_core::types::DbId;
use capstone_db::models::notification::Notification;
use capstone_db::repositories::NotificationRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireActive;
use crate::notifications::dispatch::publish_read;
use crate::notifications::stream::unread_count_sse;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /notifications`.
#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    /// Only unread notifications. Defaults to `false`.
    pub unread_only: Option<bool>,
    /// Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub marked_read: u64,
}

/// GET /api/v1/notifications
///
/// Newest first.
pub async fn list_notifications(
    RequireActive(auth): RequireActive,
    State(state): State<AppState>,
    Query(params): Query<NotificationQuery>,
) -> AppResult<Json<DataResponse<Vec<Notification>>>> {
    let notifications = NotificationRepo::list_for_user(
        &state.pool,
        auth.user_id,
        params.unread_only.unwrap_or(false),
        clamp_limit(params.limit),
        clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(DataResponse {
        data: notifications,
    }))
}

/// GET /api/v1/notifications/unread-count
pub async fn unread_count(
    RequireActive(auth): RequireActive,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UnreadCount>>> {
    let count = NotificationRepo::unread_count(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: UnreadCount { count },
    }))
}

/// GET /api/v1/notifications/stream
///
/// Server-Sent Events carrying the unread count: once on connect, then on
/// every change.
pub async fn stream_unread_count(
    RequireActive(auth): RequireActive,
    State(state): State<AppState>,
) -> impl IntoResponse {
    tracing::debug!(user_id = auth.user_id, "Unread count stream opened");
    unread_count_sse(
        state.pool.clone(),
        &state.event_bus,
        auth.user_id,
        state.shutdown.clone(),
    )
}

/// POST /api/v1/notifications/{id}/read
///
/// Idempotent: a read notification keeps its first `read_at`. 404 when the
/// notification is not the caller's.
pub async fn mark_read(
    RequireActive(auth): RequireActive,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Notification>>> {
    let notification = NotificationRepo::mark_read(&state.pool, id, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id,
        }))?;

    publish_read(&state.event_bus, auth.user_id);
    Ok(Json(DataResponse { data: notification }))
}

/// POST /api/v1/notifications/read-all
pub async fn mark_all_read(
    RequireActive(auth): RequireActive,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<MarkedRead>>> {
    let marked_read = NotificationRepo::mark_all_read(&state.pool, auth.user_id).await?;
    if marked_read > 0 {
        publish_read(&state.event_bus, auth.user_id);
    }
    Ok(Json(DataResponse {
        data: MarkedRead { marked_read },
    }))
}
