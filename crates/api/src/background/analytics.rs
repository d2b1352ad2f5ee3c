//! Dashboard analytics refresh.
//!
//! One timer feeds every open dashboard through the shared poller in
//! [`AppState::analytics`](crate::state::AppState). Alongside it, a watcher
//! on the event bus asks for an early refresh whenever a project, teacher or
//! account event lands, so counts move right after the change.

use std::sync::Arc;

use capstone_core::event_types::{TOPIC_ACCOUNT, TOPIC_PROJECT, TOPIC_TEACHER};
use capstone_db::models::analytics::AnalyticsSnapshot;
use capstone_db::repositories::AnalyticsRepo;
use capstone_db::DbPool;
use capstone_events::{PlatformEvent, SharedPoller};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

/// Run the analytics refresh loop and its event watcher until `cancel`
/// fires. `events` should be subscribed before the caller spawns this.
pub async fn run(
    pool: DbPool,
    poller: Arc<SharedPoller<AnalyticsSnapshot>>,
    events: broadcast::Receiver<PlatformEvent>,
    cancel: CancellationToken,
) {
    tracing::info!("Analytics refresh started");

    let refresh = poller.run(cancel.clone(), || {
        let pool = pool.clone();
        async move { AnalyticsRepo::snapshot(&pool).await }
    });
    tokio::join!(refresh, watch_events(events, &poller, cancel));

    tracing::info!("Analytics refresh stopped");
}

/// Whether `event` can change a dashboard count.
pub fn moves_analytics(event: &PlatformEvent) -> bool {
    matches!(event.topic(), TOPIC_PROJECT | TOPIC_TEACHER | TOPIC_ACCOUNT)
}

/// Call `refresh_soon` on `poller` for every event that moves the counts.
/// A lagged receiver refreshes once for everything it missed.
pub async fn watch_events<T>(
    mut events: broadcast::Receiver<PlatformEvent>,
    poller: &SharedPoller<T>,
    cancel: CancellationToken,
) where
    T: Clone + Send + Sync + 'static,
{
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            received = events.recv() => match received {
                Ok(event) if moves_analytics(&event) => poller.refresh_soon(),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Analytics watcher lagged");
                    poller.refresh_soon();
                }
                Err(RecvError::Closed) => break,
            },
        }
    }
}
