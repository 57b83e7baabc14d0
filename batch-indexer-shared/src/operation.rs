//! Pending index operations.

use serde::{Deserialize, Serialize};

/// A single index operation waiting to be sent in a bulk request.
///
/// Operations are produced by a request builder and owned by the batch they
/// were appended to. The only field that may change after construction is the
/// routing key, which the accumulator applies before the operation joins the
/// batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingOperation {
    /// Target index name.
    pub index: String,
    /// Target document type (category).
    pub doc_type: String,
    /// Document identifier.
    pub id: String,
    /// Serialized document source.
    pub payload: String,
    /// Explicit routing key, when it differs from the identifier.
    pub routing: Option<String>,
}

impl PendingOperation {
    /// Create a new operation without routing.
    pub fn new(
        index: impl Into<String>,
        doc_type: impl Into<String>,
        id: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            index: index.into(),
            doc_type: doc_type.into(),
            id: id.into(),
            payload: payload.into(),
            routing: None,
        }
    }

    /// Set the routing key.
    pub fn with_routing(mut self, routing: impl Into<String>) -> Self {
        self.routing = Some(routing.into());
        self
    }
}
