//! Bulk submitter implementation.

use std::sync::Arc;

use tracing::{debug, error, instrument, warn};

use crate::batch::BatchAccumulator;
use crate::classifier::{classify_backend_error, classify_connection_error, FailureClass};
use crate::connection::ConnectionManager;
use crate::errors::SubmitError;
use crate::submitter::SubmissionResult;

/// Executes accumulated batches against the backend.
///
/// One `submit` call walks this state machine:
///
/// ```text
/// ACQUIRE_HANDLE -> EXECUTE -> SUCCESS_CLEAN              -> reset batch, Ok
///                           -> SUCCESS_WITH_ITEM_FAILURES -> Ok, batch kept
///                           -> TRANSPORT_FAILURE -> REINIT -> ok:     Err(Recoverable)
///                                                          -> failed: Err(NonRecoverable)
/// ```
///
/// Only a clean round trip resets the batch. Every error path leaves it
/// untouched so the caller can retry or inspect it.
pub struct BulkSubmitter {
    connections: Arc<dyn ConnectionManager>,
}

impl BulkSubmitter {
    /// Create a submitter that acquires its handle from `connections`.
    pub fn new(connections: Arc<dyn ConnectionManager>) -> Self {
        Self { connections }
    }

    /// The connection manager this submitter uses.
    pub fn connections(&self) -> &Arc<dyn ConnectionManager> {
        &self.connections
    }

    /// Submit the batch.
    ///
    /// # Returns
    ///
    /// * `Ok(SubmissionResult)` - The round trip completed. If
    ///   `result.is_clean()` the batch has been reset, otherwise it still holds
    ///   every operation and `result.failures()` lists the rejected ones.
    /// * `Err(SubmitError::Recoverable)` - Transport failure; the connection
    ///   has been rebuilt and the same batch may be submitted again.
    /// * `Err(SubmitError::NonRecoverable)` - The connection could not be
    ///   rebuilt or the backend rejected the batch as a whole.
    #[instrument(skip(self, batch), fields(batch_size = batch.size()))]
    pub async fn submit(
        &self,
        batch: &mut BatchAccumulator,
    ) -> Result<SubmissionResult, SubmitError> {
        if batch.is_empty() {
            debug!("Nothing to submit");
            return Ok(SubmissionResult::empty());
        }

        let handle = match self.connections.handle().await {
            Ok(handle) => handle,
            Err(e) => {
                return match classify_connection_error(&e) {
                    FailureClass::Recoverable => self.recover(0, e.to_string()).await,
                    _ => Err(SubmitError::non_recoverable(e.to_string())),
                };
            }
        };

        let response = match handle.client().execute_bulk(batch.operations()).await {
            Ok(response) => response,
            Err(e) => {
                return match classify_backend_error(&e) {
                    FailureClass::Recoverable => {
                        warn!(
                            error = %e,
                            generation = handle.generation(),
                            "Bulk request failed in transport"
                        );
                        self.recover(handle.generation(), e.to_string()).await
                    }
                    _ => {
                        error!(error = %e, "Backend rejected bulk request");
                        Err(SubmitError::non_recoverable(e.to_string()))
                    }
                };
            }
        };

        let result = SubmissionResult::from_response(batch.operations(), &response)?;

        if result.is_clean() {
            debug!(
                count = result.total,
                took_ms = result.took_ms,
                "Bulk request indexed every document"
            );
            batch.reset();
        } else {
            warn!(
                failed = result.failed_count(),
                total = result.total,
                "Bulk request completed with rejected documents"
            );
        }

        Ok(result)
    }

    /// Rebuild the connection after a transport failure seen on
    /// `failed_generation` (0 when no handle was available).
    async fn recover(
        &self,
        failed_generation: u64,
        reason: String,
    ) -> Result<SubmissionResult, SubmitError> {
        match self.connections.reinitialize_from(failed_generation).await {
            Ok(()) => Err(SubmitError::recoverable(reason)),
            Err(e) => {
                error!(error = %e, cause = %reason, "Could not rebuild backend connection");
                Err(SubmitError::non_recoverable(format!(
                    "{} (after transport failure: {})",
                    e, reason
                )))
            }
        }
    }
}
