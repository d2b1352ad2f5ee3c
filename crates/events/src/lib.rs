//! In-process event plumbing for the capstone archive.
//!
//! - [`EventBus`]: publish/subscribe hub backed by `tokio::sync::broadcast`.
//! - [`PlatformEvent`]: the domain event envelope.
//! - [`SharedPoller`]: one refresh timer per resource whose latest snapshot
//!   is shared with any number of subscribers through a `watch` channel.

pub mod bus;
pub mod poller;

pub use bus::{EntityRef, EventBus, PlatformEvent};
pub use poller::SharedPoller;
