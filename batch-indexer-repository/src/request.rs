//! JSON request builder.
//!
//! Builds index operations for JSON documents, rejecting events the backend
//! would refuse anyway before they join a batch.

use serde_json::Value;

use crate::errors::RequestError;
use crate::interfaces::RequestBuilder;
use batch_indexer_shared::PendingOperation;

/// Characters the backend does not allow in index names.
const INVALID_INDEX_CHARS: &[char] = &['\\', '/', '*', '?', '"', '<', '>', '|', ' ', ',', '#', ':'];

/// Request builder for JSON object payloads.
#[derive(Debug, Clone, Default)]
pub struct JsonRequestBuilder;

impl JsonRequestBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self
    }

    fn validate_index(index: &str) -> Result<(), RequestError> {
        if index.is_empty() {
            return Err(RequestError::validation("index name is required"));
        }
        if index.starts_with(['_', '-', '+']) {
            return Err(RequestError::validation(format!(
                "index name must not start with '_', '-' or '+': {}",
                index
            )));
        }
        if index.chars().any(|c| c.is_uppercase() || INVALID_INDEX_CHARS.contains(&c)) {
            return Err(RequestError::validation(format!(
                "invalid index name: {}",
                index
            )));
        }
        Ok(())
    }
}

impl RequestBuilder for JsonRequestBuilder {
    fn build_index_operation(
        &self,
        payload: &str,
        index: &str,
        doc_type: &str,
        id: &str,
    ) -> Result<PendingOperation, RequestError> {
        Self::validate_index(index)?;
        if id.is_empty() {
            return Err(RequestError::validation("document id is required"));
        }

        let document: Value = serde_json::from_str(payload)
            .map_err(|e| RequestError::invalid_payload(format!("payload is not JSON: {}", e)))?;
        if !document.is_object() {
            return Err(RequestError::invalid_payload("payload must be a JSON object"));
        }

        Ok(PendingOperation::new(index, doc_type, id, payload))
    }
}
