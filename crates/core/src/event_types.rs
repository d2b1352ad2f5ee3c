//! Event kinds published on the in-process event bus.
//!
//! A kind is `<topic>.<what happened>`. Listeners that only care about an
//! area match on the topic.

pub const TOPIC_NOTIFICATION: &str = "notification";
pub const TOPIC_PROJECT: &str = "project";
pub const TOPIC_TEACHER: &str = "teacher";
pub const TOPIC_ACCOUNT: &str = "account";

/// A notification row was inserted for the event's recipient.
pub const NOTIFICATION_CREATED: &str = "notification.created";

/// One or more of the recipient's notifications were marked read.
pub const NOTIFICATION_READ: &str = "notification.read";

pub const PROJECT_SUBMITTED: &str = "project.submitted";
pub const PROJECT_APPROVED: &str = "project.approved";
pub const PROJECT_REJECTED: &str = "project.rejected";
pub const PROJECT_RESUBMITTED: &str = "project.resubmitted";
pub const PROJECT_DELETED: &str = "project.deleted";
pub const PROJECT_BOOKMARKED: &str = "project.bookmarked";

pub const TEACHER_APPROVED: &str = "teacher.approved";
pub const TEACHER_REJECTED: &str = "teacher.rejected";
pub const TEACHER_PROMOTED: &str = "teacher.promoted";
pub const TEACHER_DEMOTED: &str = "teacher.demoted";

pub const ACCOUNT_CREATED: &str = "account.created";
