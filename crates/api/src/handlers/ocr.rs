//! Proxy to the external OCR service.

use axum::extract::State;
use axum::Json;
use capstone_ocr::OcrText;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::rbac::RequireActive;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /ocr`.
#[derive(Debug, Deserialize)]
pub struct OcrRequest {
    /// Base64 image, optionally as a `data:image/...;base64,` URL.
    pub image: String,
}

#[derive(Debug, Serialize)]
pub struct OcrHealth {
    pub reachable: bool,
}

/// POST /api/v1/ocr
///
/// Extract text from an image. Invalid payloads are rejected before the
/// service is called; service failures surface as 502.
pub async fn extract_text(
    RequireActive(auth): RequireActive,
    State(state): State<AppState>,
    Json(input): Json<OcrRequest>,
) -> AppResult<Json<DataResponse<OcrText>>> {
    let text = state.ocr.extract_text(&input.image).await?;
    tracing::debug!(user_id = auth.user_id, chars = text.text.len(), "OCR text extracted");
    Ok(Json(DataResponse { data: text }))
}

/// GET /api/v1/ocr/health
pub async fn ocr_health(State(state): State<AppState>) -> Json<DataResponse<OcrHealth>> {
    let reachable = state.ocr.test_connection().await;
    Json(DataResponse {
        data: OcrHealth { reachable },
    })
}
