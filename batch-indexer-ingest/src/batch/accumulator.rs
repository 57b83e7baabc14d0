//! In-memory batch of pending index operations.

use std::sync::Arc;

use tracing::trace;

use batch_indexer_repository::{RequestBuilder, RequestError};
use batch_indexer_shared::PendingOperation;

/// Mutable collection of operations waiting for the next bulk submission.
///
/// The accumulator is single-writer: `add` and `reset` take `&mut self`, so a
/// batch cannot be shared between workers. Run one accumulator per worker
/// instead.
///
/// Insertion order is preserved. The backend reports per-item results in the
/// same order, which is how failures are correlated back to identifiers.
pub struct BatchAccumulator {
    builder: Arc<dyn RequestBuilder>,
    operations: Vec<PendingOperation>,
}

impl BatchAccumulator {
    /// Create an empty batch that builds operations with `builder`.
    pub fn new(builder: Arc<dyn RequestBuilder>) -> Self {
        Self {
            builder,
            operations: Vec::new(),
        }
    }

    /// Create an empty batch with room for `capacity` operations.
    pub fn with_capacity(builder: Arc<dyn RequestBuilder>, capacity: usize) -> Self {
        Self {
            builder,
            operations: Vec::with_capacity(capacity),
        }
    }

    /// Build an index operation and append it to the batch.
    ///
    /// Routing is applied only when `routing_key` is present and differs from
    /// `id`. On error the batch is left unchanged.
    pub fn add(
        &mut self,
        payload: &str,
        index: &str,
        doc_type: &str,
        id: &str,
        routing_key: Option<&str>,
    ) -> Result<(), RequestError> {
        let mut operation = self
            .builder
            .build_index_operation(payload, index, doc_type, id)?;

        if let Some(routing) = routing_key.filter(|routing| *routing != id) {
            operation = operation.with_routing(routing);
        }

        trace!(index = %operation.index, id = %operation.id, "Added operation to batch");
        self.operations.push(operation);
        Ok(())
    }

    /// Number of pending operations.
    pub fn size(&self) -> usize {
        self.operations.len()
    }

    /// Whether the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Pending operations in insertion order.
    pub fn operations(&self) -> &[PendingOperation] {
        &self.operations
    }

    /// Discard all pending operations. Calling it on an empty batch is a no-op.
    pub fn reset(&mut self) {
        self.operations.clear();
    }
}
