//! Bulk response types.
//!
//! The backend answers a bulk request with one result per operation, in the
//! order the operations were sent. These types are a fixed-shape model of that
//! reply, independent of the backend's JSON layout.

use serde::Deserialize;
use serde_json::Value;

use crate::errors::BackendError;

/// Error details attached to a failed bulk item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemError {
    /// Backend error type (e.g. `mapper_parsing_exception`).
    pub kind: String,
    /// Human readable reason.
    pub reason: String,
}

/// Result of a single operation within a bulk request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkItemResponse {
    /// Action the result belongs to (`index`, `create`, ...).
    pub action: String,
    /// Index the operation targeted.
    pub index: String,
    /// Document identifier reported by the backend.
    pub id: Option<String>,
    /// HTTP status of this item.
    pub status: u16,
    /// Error details, present when the item failed.
    pub error: Option<ItemError>,
}

impl BulkItemResponse {
    /// Create a successful item result.
    pub fn success(index: impl Into<String>, id: impl Into<String>, status: u16) -> Self {
        Self {
            action: "index".to_string(),
            index: index.into(),
            id: Some(id.into()),
            status,
            error: None,
        }
    }

    /// Create a failed item result.
    pub fn failure(
        index: impl Into<String>,
        id: impl Into<String>,
        status: u16,
        kind: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            action: "index".to_string(),
            index: index.into(),
            id: Some(id.into()),
            status,
            error: Some(ItemError {
                kind: kind.into(),
                reason: reason.into(),
            }),
        }
    }

    /// Whether the backend rejected this item.
    pub fn is_failed(&self) -> bool {
        self.error.is_some() || self.status >= 300
    }

    /// The failure message for this item, or an empty string if it succeeded.
    pub fn failure_message(&self) -> String {
        match &self.error {
            Some(error) => error.reason.clone(),
            None if self.status >= 300 => format!("item failed with status {}", self.status),
            None => String::new(),
        }
    }
}

/// Full reply to a bulk request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BulkResponse {
    /// Time the backend spent on the request, in milliseconds.
    pub took: u64,
    /// Backend-reported flag that at least one item failed.
    pub errors: bool,
    /// Per-item results, in request order.
    pub items: Vec<BulkItemResponse>,
}

/// Inner object of a bulk item, e.g. the value of `{"index": {...}}`.
#[derive(Debug, Deserialize)]
struct RawBulkItem {
    #[serde(rename = "_index", default)]
    index: String,
    #[serde(rename = "_id", default)]
    id: Option<String>,
    status: u16,
    #[serde(default)]
    error: Option<Value>,
}

impl BulkResponse {
    /// Create a response from item results.
    pub fn new(took: u64, items: Vec<BulkItemResponse>) -> Self {
        let errors = items.iter().any(BulkItemResponse::is_failed);
        Self {
            took,
            errors,
            items,
        }
    }

    /// Whether any item failed.
    pub fn has_failures(&self) -> bool {
        self.errors || self.items.iter().any(BulkItemResponse::is_failed)
    }

    /// Parse the JSON body of a `_bulk` reply.
    pub fn from_json(body: &Value) -> Result<Self, BackendError> {
        let raw_items = body["items"]
            .as_array()
            .ok_or_else(|| BackendError::parse("Bulk response has no items array"))?;

        let mut items = Vec::with_capacity(raw_items.len());
        for raw in raw_items {
            let (action, inner) = raw
                .as_object()
                .and_then(|obj| obj.iter().next())
                .ok_or_else(|| BackendError::parse("Bulk item is not an action object"))?;

            let parsed: RawBulkItem = serde_json::from_value(inner.clone())
                .map_err(|e| BackendError::parse(format!("Invalid bulk item: {}", e)))?;

            items.push(BulkItemResponse {
                action: action.clone(),
                index: parsed.index,
                id: parsed.id,
                status: parsed.status,
                error: parsed.error.as_ref().map(parse_item_error),
            });
        }

        Ok(Self {
            took: body["took"].as_u64().unwrap_or(0),
            errors: body["errors"].as_bool().unwrap_or(false),
            items,
        })
    }
}

fn parse_item_error(error: &Value) -> ItemError {
    match error {
        Value::String(reason) => ItemError {
            kind: "error".to_string(),
            reason: reason.clone(),
        },
        other => ItemError {
            kind: other["type"].as_str().unwrap_or("error").to_string(),
            reason: other["reason"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| other.to_string()),
        },
    }
}
