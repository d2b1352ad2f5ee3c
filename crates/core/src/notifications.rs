//! Notification kinds and the messages attached to them.
//!
//! Kind values must match the `chk_notifications_type` constraint.

pub const KIND_LIKE: &str = "like";
pub const KIND_COMMENT: &str = "comment";
pub const KIND_BOOKMARK: &str = "bookmark";
pub const KIND_APPROVAL: &str = "approval";
pub const KIND_REJECTION: &str = "rejection";
pub const KIND_TEACHER_APPROVED: &str = "teacher_approved";
pub const KIND_TEACHER_REJECTED: &str = "teacher_rejected";

/// Default page size for notification listing.
pub const DEFAULT_LIMIT: i64 = 50;

/// Maximum page size for notification listing.
pub const MAX_LIMIT: i64 = 100;

/// Clamp a caller-supplied page size into `1..=MAX_LIMIT`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Clamp a caller-supplied offset to be non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

pub fn like_message(project_title: &str) -> String {
    format!("Someone liked your project \"{project_title}\"")
}

pub fn bookmark_message(project_title: &str) -> String {
    format!("Someone bookmarked your project \"{project_title}\"")
}

pub fn comment_message(project_title: &str) -> String {
    format!("Someone commented on your project \"{project_title}\"")
}

pub fn approval_message(project_title: &str) -> String {
    format!("Your project \"{project_title}\" has been approved and is now public.")
}

/// The rejection message carries the moderator's notes verbatim.
pub fn rejection_message(project_title: &str, notes: &str) -> String {
    format!("Your project \"{project_title}\" was not approved. Admin notes: {notes}")
}

pub fn teacher_approved_message() -> String {
    "Your teacher account has been approved. You can now log in.".to_string()
}

pub fn teacher_rejected_message() -> String {
    "Your teacher account registration was rejected.".to_string()
}
