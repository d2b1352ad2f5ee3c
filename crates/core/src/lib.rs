//! Domain rules for the capstone project archive.
//!
//! Everything in this crate is pure: no database, no HTTP. The `db` and `api`
//! crates call into these functions to decide whether a state change is
//! allowed before touching storage.

pub mod accounts;
pub mod error;
pub mod event_types;
pub mod moderation;
pub mod notifications;
pub mod roles;
pub mod submission;
pub mod types;
