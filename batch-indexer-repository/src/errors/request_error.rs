//! Request construction errors.

use thiserror::Error;

/// Errors raised while building an index operation from an event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// A required field is missing or malformed.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The document payload is not a usable document.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

impl RequestError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create an invalid payload error.
    pub fn invalid_payload(msg: impl Into<String>) -> Self {
        Self::InvalidPayload(msg.into())
    }
}
