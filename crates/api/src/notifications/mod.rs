//! Notification side effects of API operations.
//!
//! - [`dispatch`] -- bus publication for inserted/read notifications and
//!   best-effort social notifications.
//! - [`stream`] -- per-user unread-count stream for Server-Sent Events.

pub mod dispatch;
pub mod stream;
