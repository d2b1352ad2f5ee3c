//! REST client for the OCR service, built on [`reqwest`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::image::normalize_base64_image;

/// Start of the service's 400 message for an image without text.
const NO_TEXT_PREFIX: &str = "No text found";

/// HTTP client for a single OCR service instance.
#[derive(Clone)]
pub struct OcrClient {
    client: reqwest::Client,
    base_url: String,
}

/// Text extracted from an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrText {
    pub text: String,
}

#[derive(Serialize)]
struct OcrRequest<'a> {
    image: &'a str,
}

#[derive(Deserialize)]
struct OcrErrorBody {
    error: String,
}

/// Errors from the OCR client.
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    /// The payload was rejected locally; no request was sent.
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// The HTTP request itself failed (network, DNS, timeout, etc.).
    #[error("OCR request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service read the image but found no text in it.
    #[error("No text found in image")]
    NoText,

    /// The service answered with a non-2xx status.
    #[error("OCR service error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// The service's `error` field, or the raw body when absent.
        message: String,
    },
}

impl OcrClient {
    /// Create a client for the service at `base_url` (e.g.
    /// `http://localhost:5000`). Every request is bounded by `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, OcrError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Extract text from a base64-encoded image.
    ///
    /// Accepts bare base64 or a `data:image/...;base64,` URL.
    pub async fn extract_text(&self, image: &str) -> Result<OcrText, OcrError> {
        let image = normalize_base64_image(image).map_err(OcrError::InvalidImage)?;

        let response = self
            .client
            .post(format!("{}/ocr", self.base_url))
            .json(&OcrRequest { image: &image })
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        Ok(response.json::<OcrText>().await?)
    }

    /// Whether the service answers `GET /health` with a 2xx status.
    ///
    /// Connection failures count as unreachable rather than errors.
    pub async fn test_connection(&self) -> bool {
        match self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, url = %self.base_url, "OCR health check failed");
                false
            }
        }
    }

    /// Return the response unchanged on success. A 400 whose message says no
    /// text was found becomes [`OcrError::NoText`]; any other failure is an
    /// [`OcrError::Api`] carrying the service's error message.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, OcrError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        let message = serde_json::from_str::<OcrErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or(body);
        if status == reqwest::StatusCode::BAD_REQUEST && message.starts_with(NO_TEXT_PREFIX) {
            return Err(OcrError::NoText);
        }
        Err(OcrError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
