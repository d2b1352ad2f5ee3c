//! Publishing notification changes and best-effort social notifications.

use capstone_core::event_types::{NOTIFICATION_CREATED, NOTIFICATION_READ};
use capstone_core::types::DbId;
use capstone_db::models::notification::{CreateNotification, Notification};
use capstone_db::repositories::NotificationRepo;
use capstone_events::{EventBus, PlatformEvent};

use crate::state::AppState;

/// Announce a freshly inserted notification to its recipient's streams.
pub fn publish_created(bus: &EventBus, notification: &Notification) {
    let mut event = PlatformEvent::new(NOTIFICATION_CREATED)
        .about("notification", notification.id)
        .to(notification.recipient_id);
    if let Some(sender) = notification.sender_id {
        event = event.by(sender);
    }
    bus.publish(event);
}

/// Announce that some of `recipient_id`'s notifications were marked read.
pub fn publish_read(bus: &EventBus, recipient_id: DbId) {
    bus.publish(
        PlatformEvent::new(NOTIFICATION_READ)
            .by(recipient_id)
            .to(recipient_id),
    );
}

/// Notify a project owner about a like, bookmark or comment.
///
/// Skipped when the actor owns the project. A failed insert is logged and
/// swallowed; the social action itself has already succeeded.
pub async fn notify_best_effort(state: &AppState, input: CreateNotification) {
    if input.sender_id == Some(input.recipient_id) {
        return;
    }

    match NotificationRepo::create(&state.pool, &input).await {
        Ok(notification) => publish_created(&state.event_bus, &notification),
        Err(e) => {
            tracing::warn!(
                recipient_id = input.recipient_id,
                project_id = ?input.project_id,
                kind = input.kind,
                error = %e,
                "Failed to create notification",
            );
        }
    }
}
