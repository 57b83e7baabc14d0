//! Events fed into the indexing pipeline.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A data-change event as read from the upstream source.
///
/// Every field except the document is optional; missing values are filled in
/// from configured defaults before the event is added to a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEvent {
    /// Target index, if the event names one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    /// Target document type, if the event names one.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    /// Document identifier. A new one is generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Explicit routing key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing: Option<String>,
    /// The document body.
    pub document: Value,
}

impl IndexEvent {
    /// Create an event carrying only a document.
    pub fn new(document: Value) -> Self {
        Self {
            index: None,
            doc_type: None,
            id: None,
            routing: None,
            document,
        }
    }

    /// Set the identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the target index.
    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    /// Set the routing key.
    pub fn with_routing(mut self, routing: impl Into<String>) -> Self {
        self.routing = Some(routing.into());
        self
    }

    /// Serialize the document into the payload string sent to the backend.
    pub fn payload(&self) -> String {
        match &self.document {
            Value::String(raw) => raw.clone(),
            other => other.to_string(),
        }
    }
}
