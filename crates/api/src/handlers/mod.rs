//! Request handlers.
//!
//! Each submodule holds the async handler functions for one resource.
//! Handlers validate input, call into `capstone_core` for the rules and
//! `capstone_db` repositories for storage, and map errors via
//! [`AppError`](crate::error::AppError).

pub mod analytics;
pub mod auth;
pub mod engagement;
pub mod moderation;
pub mod notification;
pub mod ocr;
pub mod profile;
pub mod project;
pub mod teacher;
