//! Error types for the batch indexer ingest.
//!
//! Submission failures are split into two variants that callers must handle
//! differently: a recoverable failure may be retried with the same batch, a
//! non-recoverable one must stop the pipeline. Rejected documents are not
//! errors at all; they are reported inside a successful `SubmissionResult`.

use batch_indexer_repository::{BackendError, RequestError};
use thiserror::Error;

/// Errors raised by a connection manager.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// No backend connection has ever been established.
    #[error("No backend connection available: {0}")]
    Unavailable(String),

    /// Every reconnect attempt failed.
    #[error("Reconnect failed after {attempts} attempts: {last_error}")]
    ReconnectFailed { attempts: u32, last_error: String },

    /// The backend refused our credentials while reconnecting.
    #[error("Authentication failed: {0}")]
    Authentication(String),
}

impl ConnectionError {
    /// Create an unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a reconnect failure.
    pub fn reconnect_failed(attempts: u32, last_error: impl Into<String>) -> Self {
        Self::ReconnectFailed {
            attempts,
            last_error: last_error.into(),
        }
    }
}

/// Errors returned by a bulk submission.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The round trip failed but the connection was rebuilt; the same batch
    /// can be submitted again.
    #[error("Recoverable bulk submission failure: {0}")]
    Recoverable(String),

    /// Retrying cannot help: the connection could not be rebuilt or the
    /// backend rejected the batch as a whole.
    #[error("Non-recoverable bulk submission failure: {0}")]
    NonRecoverable(String),
}

impl SubmitError {
    /// Create a recoverable error.
    pub fn recoverable(msg: impl Into<String>) -> Self {
        Self::Recoverable(msg.into())
    }

    /// Create a non-recoverable error.
    pub fn non_recoverable(msg: impl Into<String>) -> Self {
        Self::NonRecoverable(msg.into())
    }

    /// Whether the caller may retry the same batch.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable(_))
    }
}

/// Errors that can occur in the batch indexer ingest.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Bulk submission failed.
    #[error("Submit error: {0}")]
    SubmitError(#[from] SubmitError),

    /// Backend connection could not be established.
    #[error("Connection error: {0}")]
    ConnectionError(#[from] ConnectionError),

    /// Backend call outside a bulk submission failed.
    #[error("Backend error: {0}")]
    BackendError(#[from] BackendError),

    /// An event could not be turned into an index operation.
    #[error("Request error: {0}")]
    RequestError(#[from] RequestError),

    /// A recoverable failure persisted through every retry.
    #[error("Bulk submission still failing after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },

    /// Documents were rejected and the loader is configured to abort.
    #[error("{failed} of {total} documents rejected by the backend")]
    ItemFailures { failed: usize, total: usize },

    /// Error from the consumer component.
    #[error("Consumer error: {0}")]
    ConsumerError(String),

    /// Error parsing or decoding data.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl IngestError {
    /// Create a consumer error.
    pub fn consumer(msg: impl Into<String>) -> Self {
        Self::ConsumerError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_error_recoverable_flag() {
        assert!(SubmitError::recoverable("node down").is_recoverable());
        assert!(!SubmitError::non_recoverable("bad request").is_recoverable());
    }

    #[test]
    fn test_ingest_error_from_submit_error() {
        let err: IngestError = SubmitError::non_recoverable("reinit failed").into();
        assert_eq!(
            err.to_string(),
            "Submit error: Non-recoverable bulk submission failure: reinit failed"
        );
    }
}
