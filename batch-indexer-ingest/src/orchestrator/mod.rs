//! Orchestrator module for the batch indexer ingest.
//!
//! Coordinates the event source and the loader.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info, instrument, warn};

use crate::consumer::{EventSource, StreamMessage};
use crate::errors::IngestError;
use crate::loader::BatchLoader;

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Size of the message channel buffer.
    pub channel_buffer_size: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: 1000,
        }
    }
}

/// Orchestrator that coordinates the ingest components.
///
/// The orchestrator:
/// - Runs the event source on its own task
/// - Hands events to the loader and flushes partial batches on a timer
/// - Stops on the first error the loader cannot recover from
pub struct Orchestrator {
    source: Option<Box<dyn EventSource>>,
    loader: BatchLoader,
    config: OrchestratorConfig,
    shutdown_tx: broadcast::Sender<()>,
}

impl Orchestrator {
    /// Create a new orchestrator with the given components.
    pub fn new(source: Box<dyn EventSource>, loader: BatchLoader) -> Self {
        Self::with_config(source, loader, OrchestratorConfig::default())
    }

    /// Create a new orchestrator with custom configuration.
    pub fn with_config(
        source: Box<dyn EventSource>,
        loader: BatchLoader,
        config: OrchestratorConfig,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            source: Some(source),
            loader,
            config,
            shutdown_tx,
        }
    }

    /// The loader driven by this orchestrator.
    pub fn loader(&self) -> &BatchLoader {
        &self.loader
    }

    /// A sender that stops the event source when signalled.
    pub fn shutdown_sender(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Run the orchestrator.
    ///
    /// Blocks until the source ends, a shutdown signal arrives, or the loader
    /// reports a fatal error. Pending documents are flushed unless the loader
    /// failed. A failed source is returned as an error after that flush.
    #[instrument(skip(self))]
    pub async fn run(&mut self) -> Result<(), IngestError> {
        let source = self
            .source
            .take()
            .ok_or_else(|| IngestError::consumer("event source already consumed"))?;

        info!("Starting batch indexer orchestrator");

        let (tx, mut rx) = mpsc::channel::<StreamMessage>(self.config.channel_buffer_size);
        let shutdown_rx = self.shutdown_tx.subscribe();

        let source_handle = tokio::spawn(source.run(tx, shutdown_rx));

        let period = Duration::from_millis(self.loader.config().flush_interval_ms.max(1));
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut outcome = Ok(());

        loop {
            tokio::select! {
                msg = rx.recv() => {
                    match msg {
                        Some(StreamMessage::Events(events)) => {
                            if let Err(e) = self.loader.load(events).await {
                                error!(error = %e, "Stopping after fatal indexing error");
                                outcome = Err(e);
                                break;
                            }
                        }
                        Some(StreamMessage::Error(e)) => {
                            warn!(error = %e, "Received error from event source");
                        }
                        Some(StreamMessage::End) | None => {
                            info!("Event stream ended");
                            break;
                        }
                    }
                }
                _ = ticker.tick() => {
                    if self.loader.pending() > 0 {
                        if let Err(e) = self.loader.flush().await {
                            error!(error = %e, "Stopping after fatal indexing error");
                            outcome = Err(e);
                            break;
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        let _ = self.shutdown_tx.send(());
        drop(rx);

        if outcome.is_ok() {
            outcome = self.loader.flush().await;
            if let Err(e) = &outcome {
                error!(error = %e, pending = self.loader.pending(), "Final flush failed");
            }
        }

        let source_result = source_handle
            .await
            .unwrap_or_else(|e| Err(IngestError::consumer(format!("event source task failed: {}", e))));
        if let Err(e) = source_result {
            error!(error = %e, "Event source failed");
            if outcome.is_ok() {
                outcome = Err(e);
            }
        }

        let stats = self.loader.stats();
        info!(
            batches = stats.batches_submitted,
            indexed = stats.documents_indexed,
            failed = stats.documents_failed,
            skipped = stats.events_skipped,
            not_loaded = stats.events_not_loaded,
            retries = stats.retries,
            "Orchestrator shutdown complete"
        );
        outcome
    }

    /// Trigger a graceful shutdown.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}
