//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Identity from a JWT Bearer token (no database read).
//! - [`rbac::RequireActive`] -- Current account row must be active.
//! - [`rbac::RequireModerator`] -- Current account must be an active `admin` or `teacher_admin`.

pub mod auth;
pub mod rbac;
