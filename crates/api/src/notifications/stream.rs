//! Live unread-count stream.
//!
//! The stream emits the current count on connect and a fresh count whenever
//! the bus reports a notification created for, or read by, the user. A
//! lagged receiver recounts instead of guessing what it missed.

use std::convert::Infallible;
use std::time::Duration;

use axum::response::sse::{Event, KeepAlive, Sse};
use capstone_core::event_types::TOPIC_NOTIFICATION;
use capstone_core::types::DbId;
use capstone_db::repositories::NotificationRepo;
use capstone_db::DbPool;
use capstone_events::EventBus;
use futures::stream::{self, Stream, StreamExt};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_util::sync::CancellationToken;

/// SSE event name for count updates.
pub const UNREAD_COUNT_EVENT: &str = "unread_count";

/// Interval between keep-alive comments.
pub const KEEP_ALIVE_SECS: u64 = 15;

/// Counts (or count failures) for one user, starting with the current one.
pub fn unread_counts(
    pool: DbPool,
    bus: &EventBus,
    user_id: DbId,
) -> impl Stream<Item = Result<i64, sqlx::Error>> + Send + 'static {
    // Subscribe before the first count so nothing slips in between.
    let rx = bus.subscribe();

    let triggers = BroadcastStream::new(rx).filter_map(move |msg| {
        let relevant = match msg {
            Ok(event) => event.topic() == TOPIC_NOTIFICATION && event.is_for(user_id),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::debug!(user_id, skipped, "Unread stream lagged, recounting");
                true
            }
        };
        async move { relevant.then_some(()) }
    });

    stream::once(async {}).chain(triggers).then(move |()| {
        let pool = pool.clone();
        async move { NotificationRepo::unread_count(&pool, user_id).await }
    })
}

/// Wrap [`unread_counts`] as an SSE response that ends when `shutdown`
/// fires. Failed counts are logged and skipped.
pub fn unread_count_sse(
    pool: DbPool,
    bus: &EventBus,
    user_id: DbId,
    shutdown: CancellationToken,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let counts = unread_counts(pool, bus, user_id).take_until(shutdown.cancelled_owned());
    let events = counts.filter_map(move |count| async move {
        match count {
            Ok(count) => {
                let data = serde_json::json!({ "count": count }).to_string();
                Some(Ok(Event::default().event(UNREAD_COUNT_EVENT).data(data)))
            }
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Failed to count unread notifications");
                None
            }
        }
    });

    Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(KEEP_ALIVE_SECS))
            .text("keep-alive"),
    )
}
