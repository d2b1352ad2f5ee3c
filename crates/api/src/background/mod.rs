//! Long-running tasks spawned by `main.rs`.
//!
//! Each task takes a [`CancellationToken`](tokio_util::sync::CancellationToken)
//! and returns once it fires.

pub mod analytics;
