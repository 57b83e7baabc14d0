//! Request builder trait definition.

use crate::errors::RequestError;
use batch_indexer_shared::PendingOperation;

/// Builds index operations from raw event data.
///
/// The batch accumulator asks the builder for one operation per event and
/// applies routing itself, so implementations only deal with payload,
/// index, type and identifier.
pub trait RequestBuilder: Send + Sync {
    /// Build an index operation.
    ///
    /// # Returns
    ///
    /// * `Ok(PendingOperation)` - The operation, without routing
    /// * `Err(RequestError)` - If the payload or identifier is malformed
    fn build_index_operation(
        &self,
        payload: &str,
        index: &str,
        doc_type: &str,
        id: &str,
    ) -> Result<PendingOperation, RequestError>;
}
