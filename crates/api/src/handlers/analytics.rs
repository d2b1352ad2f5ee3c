//! Moderator dashboard figures under `/admin/analytics`.

use axum::extract::State;
use axum::Json;
use capstone_db::models::analytics::AnalyticsSnapshot;
use capstone_db::models::project::ProjectSummary;
use capstone_db::repositories::{AnalyticsRepo, ProjectRepo};

use crate::error::AppResult;
use crate::middleware::rbac::RequireModerator;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/analytics
///
/// Served from the shared snapshot. Before the first refresh completes the
/// snapshot is computed here and published for later readers.
pub async fn get_analytics(
    RequireModerator(_auth): RequireModerator,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<AnalyticsSnapshot>>> {
    if let Some(snapshot) = state.analytics.latest() {
        return Ok(Json(DataResponse { data: snapshot }));
    }

    let snapshot = AnalyticsRepo::snapshot(&state.pool).await?;
    state.analytics.publish(snapshot.clone());
    Ok(Json(DataResponse { data: snapshot }))
}

/// GET /api/v1/admin/analytics/most-liked
///
/// `data` is `null` when nothing is approved yet.
pub async fn most_liked(
    RequireModerator(_auth): RequireModerator,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Option<ProjectSummary>>>> {
    let project = ProjectRepo::most_liked_approved(&state.pool).await?;
    Ok(Json(DataResponse { data: project }))
}
