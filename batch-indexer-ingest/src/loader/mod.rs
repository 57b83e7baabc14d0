//! Loader module for the batch indexer ingest.
//!
//! Drives one accumulator and submitter pair: adds events, decides batch
//! boundaries, and owns the retry policy for recoverable failures.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, instrument, warn};

use crate::batch::BatchAccumulator;
use crate::connection::ConnectionManager;
use crate::errors::{IngestError, SubmitError};
use crate::processor::EventResolver;
use crate::submitter::{BulkSubmitter, SubmissionResult};
use batch_indexer_repository::RequestBuilder;
use batch_indexer_shared::{IndexEvent, PendingOperation};

/// Tracing target for documents that were dropped.
pub const FAILED_EVENTS_TARGET: &str = "failed_events";

/// What to do with a batch whose round trip succeeded but rejected documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemFailurePolicy {
    /// Log every rejected document on the `failed_events` target and move on.
    #[default]
    Drop,
    /// Stop the pipeline, keeping the batch for inspection.
    Abort,
}

impl FromStr for ItemFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drop" => Ok(Self::Drop),
            "abort" => Ok(Self::Abort),
            other => Err(format!("unknown item failure policy: {}", other)),
        }
    }
}

/// Configuration for the batch loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Number of documents to batch before submitting.
    pub batch_size: usize,
    /// Maximum time to wait before flushing a partial batch (in milliseconds).
    pub flush_interval_ms: u64,
    /// Maximum number of retries after a recoverable failure.
    pub max_retries: u32,
    /// Initial retry delay in milliseconds.
    pub initial_retry_delay_ms: u64,
    /// Maximum retry delay in milliseconds.
    pub max_retry_delay_ms: u64,
    /// Handling of rejected documents.
    pub item_failure_policy: ItemFailurePolicy,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            flush_interval_ms: 5000,
            max_retries: 3,
            initial_retry_delay_ms: 100,
            max_retry_delay_ms: 5000,
            item_failure_policy: ItemFailurePolicy::Drop,
        }
    }
}

/// Running totals kept by the loader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoaderStats {
    /// Batches that completed a round trip.
    pub batches_submitted: u64,
    /// Documents accepted by the backend.
    pub documents_indexed: u64,
    /// Documents rejected by the backend.
    pub documents_failed: u64,
    /// Events that could not be turned into an operation.
    pub events_skipped: u64,
    /// Events left unprocessed because a flush failed before they were added.
    pub events_not_loaded: u64,
    /// Resubmissions after recoverable failures.
    pub retries: u64,
}

/// Loader that batches events and submits them to the backend.
pub struct BatchLoader {
    accumulator: BatchAccumulator,
    submitter: BulkSubmitter,
    resolver: EventResolver,
    config: LoaderConfig,
    stats: LoaderStats,
}

impl BatchLoader {
    /// Create a new loader with default configuration.
    pub fn new(
        builder: Arc<dyn RequestBuilder>,
        connections: Arc<dyn ConnectionManager>,
        resolver: EventResolver,
    ) -> Self {
        Self::with_config(builder, connections, resolver, LoaderConfig::default())
    }

    /// Create a new loader with custom configuration.
    pub fn with_config(
        builder: Arc<dyn RequestBuilder>,
        connections: Arc<dyn ConnectionManager>,
        resolver: EventResolver,
        config: LoaderConfig,
    ) -> Self {
        Self {
            accumulator: BatchAccumulator::with_capacity(builder, config.batch_size),
            submitter: BulkSubmitter::new(connections),
            resolver,
            config,
            stats: LoaderStats::default(),
        }
    }

    /// Loader configuration.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Running totals.
    pub fn stats(&self) -> &LoaderStats {
        &self.stats
    }

    /// Number of operations waiting for the next flush.
    pub fn pending(&self) -> usize {
        self.accumulator.size()
    }

    /// Operations waiting for the next flush.
    pub fn pending_operations(&self) -> &[PendingOperation] {
        self.accumulator.operations()
    }

    /// Add events to the batch, flushing whenever it reaches the batch size.
    ///
    /// Events that cannot be built into an operation are logged and skipped.
    #[instrument(skip(self, events), fields(event_count = events.len()))]
    pub async fn load(&mut self, events: Vec<IndexEvent>) -> Result<(), IngestError> {
        let total = events.len();
        for (position, event) in events.into_iter().enumerate() {
            let resolved = self.resolver.resolve(event);

            if let Err(e) = self.accumulator.add(
                &resolved.payload,
                &resolved.index,
                &resolved.doc_type,
                &resolved.id,
                resolved.routing.as_deref(),
            ) {
                warn!(
                    target: FAILED_EVENTS_TARGET,
                    id = %resolved.id,
                    index = %resolved.index,
                    error = %e,
                    payload = %resolved.payload,
                    "Skipping event that cannot be indexed"
                );
                self.stats.events_skipped += 1;
                continue;
            }

            if self.accumulator.size() >= self.config.batch_size {
                if let Err(e) = self.flush().await {
                    let not_loaded = total - position - 1;
                    if not_loaded > 0 {
                        warn!(
                            target: FAILED_EVENTS_TARGET,
                            not_loaded = not_loaded,
                            error = %e,
                            "Events not loaded after fatal flush error"
                        );
                        self.stats.events_not_loaded += not_loaded as u64;
                    }
                    return Err(e);
                }
            }
        }

        Ok(())
    }

    /// Submit all pending operations.
    ///
    /// Recoverable failures are retried with exponential backoff. Returns an
    /// error only when the pipeline has to stop.
    #[instrument(skip(self), fields(pending = self.accumulator.size()))]
    pub async fn flush(&mut self) -> Result<(), IngestError> {
        if self.accumulator.is_empty() {
            return Ok(());
        }

        let result = self.submit_with_retry().await?;
        self.stats.batches_submitted += 1;
        self.stats.documents_indexed += result.succeeded_count() as u64;

        if result.is_clean() {
            debug!(count = result.total, "Batch indexed");
            return Ok(());
        }

        self.handle_item_failures(&result)
    }

    /// Submit the current batch, retrying recoverable failures.
    async fn submit_with_retry(&mut self) -> Result<SubmissionResult, IngestError> {
        let mut delay_ms = self.config.initial_retry_delay_ms;
        let mut attempt: u32 = 0;

        loop {
            match self.submitter.submit(&mut self.accumulator).await {
                Ok(result) => {
                    if attempt > 0 {
                        info!(
                            attempt = attempt,
                            count = result.total,
                            "Bulk submission succeeded after retry"
                        );
                    }
                    return Ok(result);
                }
                Err(SubmitError::Recoverable(reason)) => {
                    if attempt >= self.config.max_retries {
                        error!(
                            attempts = attempt + 1,
                            error = %reason,
                            "Bulk submission failed after retries"
                        );
                        return Err(IngestError::RetriesExhausted {
                            attempts: attempt + 1,
                            last_error: reason,
                        });
                    }

                    attempt += 1;
                    warn!(
                        attempt = attempt,
                        max_retries = self.config.max_retries,
                        delay_ms = delay_ms,
                        error = %reason,
                        "Bulk submission failed, retrying"
                    );
                    self.stats.retries += 1;
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    delay_ms = std::cmp::min(delay_ms.saturating_mul(2), self.config.max_retry_delay_ms);
                }
                Err(e @ SubmitError::NonRecoverable(_)) => {
                    error!(error = %e, pending = self.accumulator.size(), "Bulk submission failed permanently");
                    return Err(e.into());
                }
            }
        }
    }

    /// Apply the item failure policy to a partially rejected batch.
    fn handle_item_failures(&mut self, result: &SubmissionResult) -> Result<(), IngestError> {
        let failed = result.failed_count();
        self.stats.documents_failed += failed as u64;

        for failure in result.failures() {
            let payload = self
                .accumulator
                .operations()
                .get(failure.item_index)
                .map(|op| op.payload.as_str())
                .unwrap_or_default();
            warn!(
                target: FAILED_EVENTS_TARGET,
                id = %failure.identifier,
                index = %failure.index,
                status = failure.status,
                kind = failure.kind.as_deref().unwrap_or("unknown"),
                reason = %failure.message,
                payload = %payload,
                "Document rejected by backend"
            );
        }

        match self.config.item_failure_policy {
            ItemFailurePolicy::Drop => {
                warn!(failed = failed, total = result.total, "Dropping rejected documents");
                self.accumulator.reset();
                Ok(())
            }
            ItemFailurePolicy::Abort => Err(IngestError::ItemFailures {
                failed,
                total: result.total,
            }),
        }
    }

    /// Check if the backend is healthy.
    pub async fn health_check(&self) -> Result<bool, IngestError> {
        let handle = self.submitter.connections().handle().await?;
        Ok(handle.client().health_check().await?)
    }
}
