use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Sign-in succeeded but the account may not open a session yet.
    ///
    /// `route` names the explanatory screen the client should show.
    #[error("Session denied ({route}): {message}")]
    SessionDenied { route: &'static str, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}
