//! Route definitions for `/admin`. Every handler requires a moderator.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{analytics, moderation, teacher};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /projects                    -> list_projects (?status=)
/// GET    /projects/{id}               -> get_project
/// DELETE /projects/{id}               -> delete_project
/// POST   /projects/{id}/approve       -> approve_project
/// POST   /projects/{id}/disapprove    -> disapprove_project
///
/// GET    /analytics                   -> get_analytics
/// GET    /analytics/most-liked        -> most_liked
///
/// GET    /users                       -> list_users
/// GET    /teachers                    -> list_teachers (?status=pending)
/// POST   /teachers/{id}/approve       -> approve_teacher
/// POST   /teachers/{id}/reject        -> reject_teacher
/// POST   /teachers/{id}/promote       -> promote_teacher
/// POST   /teachers/{id}/demote        -> demote_teacher
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        // Moderation
        .route("/projects", get(moderation::list_projects))
        .route(
            "/projects/{id}",
            get(moderation::get_project).delete(moderation::delete_project),
        )
        .route("/projects/{id}/approve", post(moderation::approve_project))
        .route(
            "/projects/{id}/disapprove",
            post(moderation::disapprove_project),
        )
        // Dashboard
        .route("/analytics", get(analytics::get_analytics))
        .route("/analytics/most-liked", get(analytics::most_liked))
        // Accounts
        .route("/users", get(teacher::list_users))
        .route("/teachers", get(teacher::list_teachers))
        .route("/teachers/{id}/approve", post(teacher::approve_teacher))
        .route("/teachers/{id}/reject", post(teacher::reject_teacher))
        .route("/teachers/{id}/promote", post(teacher::promote_teacher))
        .route("/teachers/{id}/demote", post(teacher::demote_teacher))
}
