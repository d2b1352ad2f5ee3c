//! Route definitions for `/profile` and `/profiles`.

use axum::routing::get;
use axum::Router;

use crate::handlers::profile;
use crate::state::AppState;

/// Routes merged at the API root.
///
/// ```text
/// GET    /profile              -> get_own_profile
/// PUT    /profile              -> update_own_profile
/// GET    /profiles/search      -> search_profiles
/// GET    /profiles/{id}        -> get_public_profile
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(profile::get_own_profile).put(profile::update_own_profile),
        )
        .route("/profiles/search", get(profile::search_profiles))
        .route("/profiles/{id}", get(profile::get_public_profile))
}
