//! Backend error types.
//!
//! This module defines the errors a backend client can raise while talking to
//! the search cluster. Whether a given error is worth retrying is decided by
//! the failure classifier in the ingest crate, not here.

use thiserror::Error;

/// Errors that can occur while executing requests against the search backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The backend could not be reached (connection refused, no node available).
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    /// The request did not complete in time.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The backend answered with a non-success status for the whole request.
    #[error("Request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The backend refused our credentials.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The backend response could not be understood.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The client could not be built from the given configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl BackendError {
    /// Create an unreachable error.
    pub fn unreachable(msg: impl Into<String>) -> Self {
        Self::Unreachable(msg.into())
    }

    /// Create a timeout error.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create a rejection error.
    pub fn rejected(status: u16, msg: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: msg.into(),
        }
    }

    /// Create an authentication error.
    pub fn authentication(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Map a non-success HTTP status and body to an error.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        match status {
            401 | 403 => Self::authentication(format!("status {}: {}", status, body.into())),
            _ => Self::rejected(status, body),
        }
    }
}
