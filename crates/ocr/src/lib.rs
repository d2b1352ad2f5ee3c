//! HTTP client for the external OCR service.
//!
//! The service exposes `POST /ocr` (base64 image in, extracted text out)
//! and `GET /health`. Image payloads are normalized and checked locally
//! before anything is sent.

pub mod client;
pub mod image;

pub use client::{OcrClient, OcrError, OcrText};
