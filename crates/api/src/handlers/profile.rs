//! Handlers for `/profile` (own account) and `/profiles` (other accounts).

use axum::extract::{Path, Query, State};
use axum::Json;
use capstone_core::error::CoreError;
use capstone_core::types::DbId;
use capstone_db::models::user::{PublicProfile, UpdateProfile, UserProfile};
use capstone_db::repositories::UserRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireActive;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /profiles/search`.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /api/v1/profile
pub async fn get_own_profile(
    RequireActive(auth): RequireActive,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;
    Ok(Json(DataResponse { data: user.into() }))
}

/// PUT /api/v1/profile
///
/// Update display fields. Role, status and email are not editable here.
pub async fn update_own_profile(
    RequireActive(auth): RequireActive,
    State(state): State<AppState>,
    Json(mut input): Json<UpdateProfile>,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    if let Some(name) = input.full_name.as_deref() {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "Full name cannot be empty".into(),
            )));
        }
        input.full_name = Some(name.to_string());
    }

    let user = UserRepo::update_profile(&state.pool, auth.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    tracing::debug!(user_id = user.id, "Profile updated");
    Ok(Json(DataResponse { data: user.into() }))
}

/// GET /api/v1/profiles/search?q=
///
/// Active accounts whose name contains `q`. A blank query returns nothing.
pub async fn search_profiles(
    RequireActive(_auth): RequireActive,
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<DataResponse<Vec<PublicProfile>>>> {
    let q = params.q.trim();
    if q.is_empty() {
        return Ok(Json(DataResponse { data: Vec::new() }));
    }
    let users = UserRepo::search_by_name(&state.pool, q).await?;
    Ok(Json(DataResponse {
        data: users.into_iter().map(PublicProfile::from).collect(),
    }))
}

/// GET /api/v1/profiles/{id}
pub async fn get_public_profile(
    RequireActive(_auth): RequireActive,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PublicProfile>>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(DataResponse { data: user.into() }))
}
