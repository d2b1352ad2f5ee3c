//! Notification entity models and DTOs.

use capstone_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub recipient_id: DbId,
    pub sender_id: Option<DbId>,
    pub project_id: Option<DbId>,
    #[serde(rename = "type")]
    pub notification_type: String,
    pub message: String,
    #[serde(rename = "read")]
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for inserting a notification.
#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub recipient_id: DbId,
    pub sender_id: Option<DbId>,
    pub project_id: Option<DbId>,
    pub kind: &'static str,
    pub message: String,
}
