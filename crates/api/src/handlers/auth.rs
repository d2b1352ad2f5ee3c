//! Handlers for the `/auth` resource: signup, login, refresh, logout,
//! session and password change.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use capstone_core::accounts::{
    ensure_session_allowed, initial_status, resolve_session_route, SessionRoute,
};
use capstone_core::error::CoreError;
use capstone_core::event_types::ACCOUNT_CREATED;
use capstone_core::roles::{validate_signup_role, ROLE_USER};
use capstone_core::submission::validate_signup;
use capstone_db::models::session::CreateSession;
use capstone_db::models::user::{CreateUser, User, UserProfile};
use capstone_db::repositories::{SessionRepo, UserRepo};
use capstone_events::PlatformEvent;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireActive;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup`.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    /// `user` (default) or `teacher`.
    pub role: Option<String>,
    pub year_level: Option<String>,
    pub block: Option<String>,
    pub gender: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Request body for `POST /auth/change-password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Returned by signup. No tokens: the client signs in separately, and a
/// teacher cannot until approved.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub user: UserProfile,
    pub route: SessionRoute,
    pub message: Option<&'static str>,
}

/// Returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub route: SessionRoute,
    pub user: UserProfile,
}

/// Returned by `GET /auth/session`.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: UserProfile,
    pub route: SessionRoute,
    pub allowed: bool,
    pub message: Option<&'static str>,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Create a `user` or `teacher` account. Teachers start pending approval.
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<SignupResponse>>)> {
    validate_signup(
        &input.full_name,
        &input.email,
        &input.password,
        &input.confirm_password,
    )?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let role = input.role.as_deref().unwrap_or(ROLE_USER);
    validate_signup_role(role).map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: normalize_email(&input.email),
            password_hash,
            full_name: input.full_name.trim().to_string(),
            role: role.to_string(),
            status: initial_status(role).to_string(),
            year_level: input.year_level,
            block: input.block,
            gender: input.gender,
        },
    )
    .await?;

    let route = resolve_session_route(&user.role, &user.status);
    tracing::info!(user_id = user.id, role = %user.role, status = %user.status, "Account created");
    state
        .event_bus
        .publish(PlatformEvent::new(ACCOUNT_CREATED).about("user", user.id));

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SignupResponse {
                user: user.into(),
                route,
                message: route.denial_message(),
            },
        }),
    ))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Pending and rejected teachers get
/// 403 `SESSION_DENIED` with the route to show and no tokens.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let user = UserRepo::find_by_email(&state.pool, &normalize_email(&input.email))
        .await?
        .ok_or_else(invalid_credentials)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid_credentials());
    }

    let route = ensure_session_allowed(&user.role, &user.status).inspect_err(|_| {
        tracing::info!(user_id = user.id, status = %user.status, "Sign-in denied");
    })?;

    let response = create_auth_response(&state, user, route).await?;
    Ok(Json(DataResponse { data: response }))
}

/// POST /api/v1/auth/refresh
///
/// Rotate a refresh token. The old session is revoked before new tokens
/// are issued; a token that was already rotated is rejected.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let token_hash = hash_refresh_token(&input.refresh_token);

    let invalid = || {
        AppError::Core(CoreError::Unauthorized(
            "Invalid or expired refresh token".into(),
        ))
    };

    let session = SessionRepo::find_by_refresh_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(invalid)?;

    if !SessionRepo::revoke(&state.pool, session.id).await? {
        return Err(invalid());
    }

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Account no longer exists".into())))?;

    let route = ensure_session_allowed(&user.role, &user.status)?;

    let response = create_auth_response(&state, user, route).await?;
    Ok(Json(DataResponse { data: response }))
}

/// POST /api/v1/auth/logout
///
/// Revoke all sessions for the caller. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, auth.user_id).await?;
    tracing::debug!(user_id = auth.user_id, revoked, "Sessions revoked");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/auth/change-password
///
/// Verify the current password, store the new hash and revoke every
/// refresh session. The caller gets a fresh token pair; other devices must
/// sign in again once their access token expires.
pub async fn change_password(
    RequireActive(auth): RequireActive,
    State(state): State<AppState>,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    if input.new_password != input.confirm_password {
        return Err(AppError::Core(CoreError::Validation(
            "Passwords do not match".into(),
        )));
    }
    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    if input.new_password == input.current_password {
        return Err(AppError::Core(CoreError::Validation(
            "New password must be different from the current password".into(),
        )));
    }

    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Account no longer exists".into())))?;

    let current_valid = verify_password(&input.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_valid {
        return Err(AppError::Core(CoreError::Validation(
            "Current password is incorrect".into(),
        )));
    }

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &password_hash).await?;

    let revoked = SessionRepo::revoke_all_for_user(&state.pool, user.id).await?;
    tracing::info!(user_id = user.id, revoked, "Password changed");

    let route = ensure_session_allowed(&user.role, &user.status)?;
    let response = create_auth_response(&state, user, route).await?;
    Ok(Json(DataResponse { data: response }))
}

/// GET /api/v1/auth/session
///
/// Recompute the caller's route from the stored account, so role changes
/// made since sign-in are visible to the client.
pub async fn session(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<SessionResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Account no longer exists".into())))?;

    let route = resolve_session_route(&user.role, &user.status);

    Ok(Json(DataResponse {
        data: SessionResponse {
            user: user.into(),
            route,
            allowed: route.is_allowed(),
            message: route.denial_message(),
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Issue an access token, persist a refresh session, and build the response.
async fn create_auth_response(
    state: &AppState,
    user: User,
    route: SessionRoute,
) -> AppResult<AuthResponse> {
    let jwt = &state.config.jwt;

    let access_token = generate_access_token(user.id, &user.role, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_token, refresh_token_hash) = generate_refresh_token();

    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash,
            expires_at: jwt.refresh_expires_at(),
        },
    )
    .await?;

    Ok(AuthResponse {
        access_token,
        refresh_token,
        expires_in: jwt.access_expiry_secs(),
        route,
        user: user.into(),
    })
}
