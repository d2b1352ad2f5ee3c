pub mod admin;
pub mod auth;
pub mod health;
pub mod notification;
pub mod ocr;
pub mod profile;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/signup, /auth/login, /auth/refresh         public
/// /auth/logout, /auth/session                       bearer token
///
/// /profile                                          own profile (get, update)
/// /profiles/search, /profiles/{id}                  other accounts
///
/// /projects                                         feed, submit
/// /projects/search, /projects/mine, /projects/bookmarked
/// /projects/{id}                                    detail, owner delete
/// /projects/{id}/resubmit                           owner resubmit
/// /projects/{id}/like, /projects/{id}/bookmark      toggles
/// /projects/{id}/comments                           list, add
///
/// /notifications                                    list
/// /notifications/unread-count                       count
/// /notifications/stream                             SSE unread count
/// /notifications/read-all, /notifications/{id}/read
///
/// /admin/projects                                   moderation queue and lists
/// /admin/projects/{id}                              detail, delete
/// /admin/projects/{id}/approve|disapprove           decisions
/// /admin/analytics, /admin/analytics/most-liked     dashboard
/// /admin/users                                      user-role accounts
/// /admin/teachers                                   teacher accounts
/// /admin/teachers/{id}/approve|reject|promote|demote
///
/// /ocr                                              text extraction
/// /ocr/health                                       service reachability
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .merge(profile::router())
        .nest("/projects", project::router())
        .nest("/notifications", notification::router())
        .nest("/admin", admin::router())
        .nest("/ocr", ocr::router())
}
