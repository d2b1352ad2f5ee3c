//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Methods that must share a
//! transaction take a generic `PgExecutor` instead.

pub mod analytics_repo;
pub mod engagement_repo;
pub mod notification_repo;
pub mod project_repo;
pub mod session_repo;
pub mod user_repo;

pub use analytics_repo::AnalyticsRepo;
pub use engagement_repo::EngagementRepo;
pub use notification_repo::NotificationRepo;
pub use project_repo::{DecisionOutcome, ProjectRepo};
pub use session_repo::SessionRepo;
pub use user_repo::{AccountChange, UserRepo};

/// Build a case-insensitive substring pattern for `ILIKE`, escaping the
/// wildcard characters in the user's query.
pub(crate) fn contains_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
