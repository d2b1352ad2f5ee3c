//! Fan-out of domain events over a `tokio::sync::broadcast` channel.
//!
//! Handlers publish a [`PlatformEvent`] after a write commits. Two kinds of
//! listener consume them: per-user unread-count streams, which match on
//! [`PlatformEvent::is_for`], and the analytics watcher, which matches on
//! [`PlatformEvent::topic`].

use capstone_core::types::{DbId, Timestamp};
use chrono::Utc;
use serde::Serialize;
use tokio::sync::broadcast;

/// Slots kept for receivers that fall behind before they see `Lagged`.
const DEFAULT_CAPACITY: usize = 1024;

/// The row an event is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntityRef {
    pub kind: &'static str,
    pub id: DbId,
}

/// Something that happened, named by one of the `event_types` constants.
#[derive(Debug, Clone, Serialize)]
pub struct PlatformEvent {
    pub kind: &'static str,
    pub entity: Option<EntityRef>,
    pub actor_id: Option<DbId>,
    /// Set on inbox events; the user whose unread count changed.
    pub recipient_id: Option<DbId>,
    pub occurred_at: Timestamp,
}

impl PlatformEvent {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entity: None,
            actor_id: None,
            recipient_id: None,
            occurred_at: Utc::now(),
        }
    }

    pub fn about(mut self, kind: &'static str, id: DbId) -> Self {
        self.entity = Some(EntityRef { kind, id });
        self
    }

    pub fn by(mut self, actor_id: DbId) -> Self {
        self.actor_id = Some(actor_id);
        self
    }

    pub fn to(mut self, recipient_id: DbId) -> Self {
        self.recipient_id = Some(recipient_id);
        self
    }

    /// The part of `kind` before the first dot (`"project"` for
    /// `"project.approved"`).
    pub fn topic(&self) -> &'static str {
        self.kind.split_once('.').map_or(self.kind, |(topic, _)| topic)
    }

    /// Whether this is an inbox event addressed to `user_id`.
    pub fn is_for(&self, user_id: DbId) -> bool {
        self.recipient_id == Some(user_id)
    }
}

/// Shared through `Arc<EventBus>` in the application state.
pub struct EventBus {
    sender: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Send `event` to every live receiver and return how many there were.
    /// With no receivers the event is dropped.
    pub fn publish(&self, event: PlatformEvent) -> usize {
        tracing::trace!(kind = event.kind, "Publishing event");
        self.sender.send(event).unwrap_or(0)
    }

    /// Receive events published from now on. A receiver that falls more
    /// than the channel capacity behind gets `RecvError::Lagged`.
    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}
