//! Failure classification.
//!
//! Maps backend errors, connection errors and per-item bulk results onto the
//! three outcomes the submitter acts on.

use crate::errors::ConnectionError;
use batch_indexer_repository::{BackendError, BulkItemResponse};

/// How a failure must be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Transient backend unavailability: reconnect and retry the batch.
    Recoverable,
    /// Reconnecting or retrying cannot fix it: stop.
    NonRecoverable,
    /// A single document was rejected in an otherwise completed round trip.
    ItemLevel,
}

/// HTTP statuses that signal a busy or unavailable cluster.
const TRANSIENT_STATUSES: &[u16] = &[408, 429, 502, 503, 504];

/// Classify an error raised by a backend client.
pub fn classify_backend_error(error: &BackendError) -> FailureClass {
    match error {
        BackendError::Unreachable(_) | BackendError::Timeout(_) => FailureClass::Recoverable,
        BackendError::Rejected { status, .. } if TRANSIENT_STATUSES.contains(status) => {
            FailureClass::Recoverable
        }
        BackendError::Rejected { .. }
        | BackendError::Authentication(_)
        | BackendError::ParseError(_)
        | BackendError::ConfigError(_) => FailureClass::NonRecoverable,
    }
}

/// Classify an error raised by a connection manager.
pub fn classify_connection_error(error: &ConnectionError) -> FailureClass {
    match error {
        ConnectionError::Unavailable(_) => FailureClass::Recoverable,
        ConnectionError::ReconnectFailed { .. } | ConnectionError::Authentication(_) => {
            FailureClass::NonRecoverable
        }
    }
}

/// Classify one item of a completed bulk round trip.
///
/// Returns `None` for items that succeeded.
pub fn classify_item(item: &BulkItemResponse) -> Option<FailureClass> {
    item.is_failed().then_some(FailureClass::ItemLevel)
}
