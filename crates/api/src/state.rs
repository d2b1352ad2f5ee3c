use std::sync::Arc;

use capstone_db::models::analytics::AnalyticsSnapshot;
use capstone_events::{EventBus, SharedPoller};
use capstone_ocr::OcrClient;
use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: capstone_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Event bus for platform events (notification fan-out, audit logging).
    pub event_bus: Arc<EventBus>,
    /// Client for the external OCR service.
    pub ocr: OcrClient,
    /// Dashboard snapshot refreshed by the analytics background task.
    pub analytics: Arc<SharedPoller<AnalyticsSnapshot>>,
    /// Cancelled when shutdown starts; ends long-lived streams.
    pub shutdown: CancellationToken,
}
