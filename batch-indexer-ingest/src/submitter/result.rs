//! Submission result types.

use crate::classifier::{classify_item, FailureClass};
use crate::errors::SubmitError;
use batch_indexer_repository::BulkResponse;
use batch_indexer_shared::PendingOperation;

/// Overall outcome of a completed round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStatus {
    /// Every item was accepted.
    Clean,
    /// The backend was reachable but rejected at least one item.
    ItemFailures,
}

/// A document the backend rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    /// Position of the operation in the submitted batch.
    pub item_index: usize,
    /// Identifier of the document, as it was added to the batch.
    pub identifier: String,
    /// Index the document was sent to.
    pub index: String,
    /// HTTP status of the item.
    pub status: u16,
    /// Backend error type, if reported.
    pub kind: Option<String>,
    /// Failure message.
    pub message: String,
}

/// Result for one item of the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Succeeded { item_index: usize, identifier: String },
    Failed(ItemFailure),
}

/// Outcome of one successful `submit` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionResult {
    /// Number of operations sent.
    pub total: usize,
    /// Backend processing time in milliseconds.
    pub took_ms: u64,
    /// Whether any item failed.
    pub status: SubmissionStatus,
    /// Per-item outcomes, in batch order.
    pub outcomes: Vec<ItemOutcome>,
}

impl SubmissionResult {
    /// Result of submitting an empty batch.
    pub fn empty() -> Self {
        Self {
            total: 0,
            took_ms: 0,
            status: SubmissionStatus::Clean,
            outcomes: Vec::new(),
        }
    }

    /// Correlate a bulk response with the operations that produced it.
    ///
    /// Items are matched by position. A response whose item count differs
    /// from the batch cannot be correlated and is rejected as non-recoverable.
    pub fn from_response(
        operations: &[PendingOperation],
        response: &BulkResponse,
    ) -> Result<Self, SubmitError> {
        if response.items.len() != operations.len() {
            return Err(SubmitError::non_recoverable(format!(
                "bulk response has {} items for {} operations",
                response.items.len(),
                operations.len()
            )));
        }

        let outcomes: Vec<ItemOutcome> = operations
            .iter()
            .zip(&response.items)
            .enumerate()
            .map(|(item_index, (operation, item))| match classify_item(item) {
                Some(FailureClass::ItemLevel) => ItemOutcome::Failed(ItemFailure {
                    item_index,
                    identifier: operation.id.clone(),
                    index: operation.index.clone(),
                    status: item.status,
                    kind: item.error.as_ref().map(|e| e.kind.clone()),
                    message: item.failure_message(),
                }),
                _ => ItemOutcome::Succeeded {
                    item_index,
                    identifier: operation.id.clone(),
                },
            })
            .collect();

        let status = if outcomes.iter().any(|o| matches!(o, ItemOutcome::Failed(_))) {
            SubmissionStatus::ItemFailures
        } else {
            SubmissionStatus::Clean
        };

        Ok(Self {
            total: operations.len(),
            took_ms: response.took,
            status,
            outcomes,
        })
    }

    /// Whether every item was accepted.
    pub fn is_clean(&self) -> bool {
        self.status == SubmissionStatus::Clean
    }

    /// Rejected items, in batch order.
    pub fn failures(&self) -> impl Iterator<Item = &ItemFailure> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            ItemOutcome::Failed(failure) => Some(failure),
            ItemOutcome::Succeeded { .. } => None,
        })
    }

    /// Number of rejected items.
    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }

    /// Number of accepted items.
    pub fn succeeded_count(&self) -> usize {
        self.total - self.failed_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use batch_indexer_repository::BulkItemResponse;

    fn ops(ids: &[&str]) -> Vec<PendingOperation> {
        ids.iter()
            .map(|id| PendingOperation::new("events", "event", *id, "{}"))
            .collect()
    }

    #[test]
    fn test_clean_response() {
        let operations = ops(&["a", "b"]);
        let response = BulkResponse::new(
            7,
            vec![
                BulkItemResponse::success("events", "a", 201),
                BulkItemResponse::success("events", "b", 200),
            ],
        );

        let result = SubmissionResult::from_response(&operations, &response).unwrap();

        assert!(result.is_clean());
        assert_eq!(result.total, 2);
        assert_eq!(result.took_ms, 7);
        assert_eq!(result.succeeded_count(), 2);
        assert_eq!(result.failed_count(), 0);
    }

    #[test]
    fn test_failures_use_batch_identifiers() {
        let operations = ops(&["a", "b", "c"]);
        // The backend may omit or rewrite ids; correlation is positional.
        let mut rejected = BulkItemResponse::failure("events", "ignored", 409, "version_conflict", "conflict");
        rejected.id = None;
        let response = BulkResponse::new(
            1,
            vec![
                BulkItemResponse::success("events", "a", 201),
                rejected,
                BulkItemResponse::failure("events", "c", 400, "mapper_parsing_exception", "bad field"),
            ],
        );

        let result = SubmissionResult::from_response(&operations, &response).unwrap();

        assert_eq!(result.status, SubmissionStatus::ItemFailures);
        let failures: Vec<&ItemFailure> = result.failures().collect();
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].item_index, 1);
        assert_eq!(failures[0].identifier, "b");
        assert_eq!(failures[0].status, 409);
        assert_eq!(failures[1].identifier, "c");
        assert_eq!(failures[1].kind.as_deref(), Some("mapper_parsing_exception"));
        assert_eq!(failures[1].message, "bad field");
        assert_eq!(result.succeeded_count(), 1);
    }

    #[test]
    fn test_item_count_mismatch_is_non_recoverable() {
        let operations = ops(&["a", "b"]);
        let response = BulkResponse::new(1, vec![BulkItemResponse::success("events", "a", 201)]);

        let result = SubmissionResult::from_response(&operations, &response);

        assert!(matches!(result, Err(SubmitError::NonRecoverable(_))));
    }

    #[test]
    fn test_empty_result() {
        let result = SubmissionResult::empty();
        assert!(result.is_clean());
        assert_eq!(result.total, 0);
        assert_eq!(result.failures().count(), 0);
    }
}
