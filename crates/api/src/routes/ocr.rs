//! Route definitions for `/ocr`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::ocr;
use crate::state::AppState;

/// Routes mounted at `/ocr`.
///
/// ```text
/// POST   /          -> extract_text (auth required)
/// GET    /health    -> ocr_health
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(ocr::extract_text))
        .route("/health", get(ocr::ocr_health))
}
