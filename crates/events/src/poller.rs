//! Shared periodic refresh.
//!
//! A [`SharedPoller`] owns a single timer for one resource. Each tick runs
//! the fetch function once and stores the result in a `watch` channel, so
//! every reader sees the same latest snapshot no matter how many screens
//! are open. Ticks never overlap: a slow fetch delays the next tick instead
//! of racing it.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::sync::{watch, Notify};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// One timer, many subscribers.
pub struct SharedPoller<T> {
    name: &'static str,
    period: Duration,
    sender: watch::Sender<Option<T>>,
    wake: Notify,
}

impl<T> SharedPoller<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a poller that refreshes every `period`. No snapshot is
    /// available until the first fetch succeeds.
    pub fn new(name: &'static str, period: Duration) -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            name,
            period,
            sender,
            wake: Notify::new(),
        }
    }

    /// Receive every snapshot published from now on.
    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.sender.subscribe()
    }

    /// The most recent snapshot, if one has been fetched.
    pub fn latest(&self) -> Option<T> {
        self.sender.borrow().clone()
    }

    /// Publish a snapshot obtained outside the timer.
    pub fn publish(&self, value: T) {
        self.sender.send_replace(Some(value));
    }

    /// Ask the running loop to refresh before the next tick.
    pub fn refresh_soon(&self) {
        self.wake.notify_one();
    }

    /// Run the refresh loop until `cancel` fires.
    ///
    /// Fetch errors are logged and the previous snapshot is kept.
    pub async fn run<F, Fut, E>(&self, cancel: CancellationToken, mut fetch: F)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!(poller = self.name, "Poller cancelled");
                    break;
                }
                _ = interval.tick() => {}
                _ = self.wake.notified() => {
                    interval.reset();
                }
            }

            match fetch().await {
                Ok(value) => {
                    self.sender.send_replace(Some(value));
                }
                Err(e) => {
                    tracing::warn!(poller = self.name, error = %e, "Poll refresh failed");
                }
            }
        }
    }
}
