//! Bulk request body rendering.
//!
//! A bulk body is a sequence of line pairs: an action line naming the target
//! index and document, followed by the document source.

use serde_json::{json, Map, Value};

use crate::errors::BackendError;
use batch_indexer_shared::PendingOperation;

/// Build the action line for an index operation.
pub(crate) fn action_line(operation: &PendingOperation, send_document_type: bool) -> Value {
    let mut meta = Map::new();
    meta.insert("_index".to_string(), json!(operation.index));
    meta.insert("_id".to_string(), json!(operation.id));
    if send_document_type && !operation.doc_type.is_empty() {
        meta.insert("_type".to_string(), json!(operation.doc_type));
    }
    if let Some(ref routing) = operation.routing {
        meta.insert("routing".to_string(), json!(routing));
    }

    json!({ "index": meta })
}

/// Render all operations into bulk body lines.
pub(crate) fn render_body(
    operations: &[PendingOperation],
    send_document_type: bool,
) -> Result<Vec<Value>, BackendError> {
    let mut lines = Vec::with_capacity(operations.len() * 2);

    for operation in operations {
        let source: Value = serde_json::from_str(&operation.payload).map_err(|e| {
            BackendError::parse(format!(
                "Payload for document {} is not JSON: {}",
                operation.id, e
            ))
        })?;
        lines.push(action_line(operation, send_document_type));
        lines.push(source);
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_line_without_routing() {
        let op = PendingOperation::new("events", "event", "id-1", "{}");

        let line = action_line(&op, false);

        assert_eq!(line, json!({"index": {"_index": "events", "_id": "id-1"}}));
    }

    #[test]
    fn test_action_line_with_routing_and_type() {
        let op = PendingOperation::new("events", "event", "id-1", "{}").with_routing("tenant");

        let line = action_line(&op, true);

        assert_eq!(line["index"]["routing"], "tenant");
        assert_eq!(line["index"]["_type"], "event");
    }

    #[test]
    fn test_render_body_pairs_lines() {
        let ops = vec![
            PendingOperation::new("events", "event", "1", r#"{"a":1}"#),
            PendingOperation::new("events", "event", "2", r#"{"a":2}"#),
        ];

        let body = render_body(&ops, false).unwrap();

        assert_eq!(body.len(), 4);
        assert_eq!(body[0]["index"]["_id"], "1");
        assert_eq!(body[1], json!({"a": 1}));
        assert_eq!(body[2]["index"]["_id"], "2");
        assert_eq!(body[3], json!({"a": 2}));
    }

    #[test]
    fn test_render_body_rejects_invalid_payload() {
        let ops = vec![PendingOperation::new("events", "event", "1", "not json")];
        assert!(matches!(
            render_body(&ops, false),
            Err(BackendError::ParseError(_))
        ));
    }
}
