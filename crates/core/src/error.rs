//! Domain error taxonomy.
//!
//! Every lifecycle operation and every storage port returns [`CoreError`].
//! The API layer maps each variant to a stable error code.

use crate::types::Id;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A referenced queue, session, ticket, or user does not exist. Deleted
    /// tickets are reported as missing by the non-delete transitions.
    #[error("No {entity} exists with id {id}")]
    NotFound { entity: &'static str, id: Id },

    /// The supplied session is not one of the queue's restricted sessions.
    #[error("Cannot sign up with invalid session {0}")]
    InvalidSession(String),

    /// The supplied secret is absent or does not match the session secret.
    #[error("Cannot sign up with an invalid secret")]
    InvalidSecret,

    /// The acting identity lacks the required role or ownership.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// No acting identity where one is required.
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn not_found(entity: &'static str, id: Id) -> Self {
        Self::NotFound { entity, id }
    }
}

/// Flattens to the field errors' messages, without the field keys.
impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_values()
            .flatten()
            .map(|e| {
                e.message
                    .as_ref()
                    .map_or_else(|| e.code.to_string(), ToString::to_string)
            })
            .collect();
        messages.sort();
        CoreError::Validation(messages.join("; "))
    }
}
