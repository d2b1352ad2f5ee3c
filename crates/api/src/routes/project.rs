//! Route definitions for `/projects`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{engagement, project};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                  -> list_feed
/// POST   /                  -> submit_project
/// GET    /search            -> search_projects
/// GET    /mine              -> list_own_projects
/// GET    /bookmarked        -> list_bookmarked
/// GET    /{id}              -> get_project
/// DELETE /{id}              -> delete_own_project
/// POST   /{id}/resubmit     -> resubmit_project
/// POST   /{id}/like         -> toggle_like
/// POST   /{id}/bookmark     -> toggle_bookmark
/// GET    /{id}/comments     -> list_comments
/// POST   /{id}/comments     -> add_comment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list_feed).post(project::submit_project))
        .route("/search", get(project::search_projects))
        .route("/mine", get(project::list_own_projects))
        .route("/bookmarked", get(project::list_bookmarked))
        .route(
            "/{id}",
            get(project::get_project).delete(project::delete_own_project),
        )
        .route("/{id}/resubmit", post(project::resubmit_project))
        .route("/{id}/like", post(engagement::toggle_like))
        .route("/{id}/bookmark", post(engagement::toggle_bookmark))
        .route(
            "/{id}/comments",
            get(engagement::list_comments).post(engagement::add_comment),
        )
}
