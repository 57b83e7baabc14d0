//! Backend client trait definitions.
//!
//! This module defines the abstract interface for bulk submission against the
//! search backend, and the connector used to build fresh clients.

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::BackendError;
use crate::types::BulkResponse;
use batch_indexer_shared::PendingOperation;

/// Abstract interface for a live connection to the search backend.
///
/// Implementations encapsulate the backend's bulk wire protocol. A client is
/// never mutated after it is built; reconnecting means building a new one
/// through a [`BackendConnector`].
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// Execute a bulk request containing the given operations.
    ///
    /// # Arguments
    ///
    /// * `operations` - The operations to send, in batch order
    ///
    /// # Returns
    ///
    /// * `Ok(BulkResponse)` - The round trip completed. Individual items may
    ///   still have failed; their results follow `operations` order.
    /// * `Err(BackendError)` - The round trip itself failed or the backend
    ///   rejected the whole request.
    async fn execute_bulk(
        &self,
        operations: &[PendingOperation],
    ) -> Result<BulkResponse, BackendError>;

    /// Check if the backend is healthy and reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the backend is healthy
    /// * `Ok(false)` - If the backend is reachable but unhealthy
    /// * `Err(BackendError)` - If the health check fails to execute
    async fn health_check(&self) -> Result<bool, BackendError>;

    /// Release resources held by this client.
    ///
    /// Called once the client has been replaced by a newer one. The default
    /// implementation does nothing.
    async fn close(&self) {}
}

/// Factory for backend clients.
///
/// The connection manager calls `connect` on startup and every time it has to
/// rebuild the connection after a transport failure.
#[async_trait]
pub trait BackendConnector: Send + Sync {
    /// Build a new client and verify the backend answers.
    async fn connect(&self) -> Result<Arc<dyn BackendClient>, BackendError>;
}
