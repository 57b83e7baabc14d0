//! # Batch Indexer Ingest
//!
//! This crate provides the components that turn a stream of events into bulk
//! index requests and keep submitting them across backend outages.
//!
//! ## Architecture
//!
//! 1. **Consumer**: Reads events from an upstream source
//! 2. **Processor**: Resolves each event's target index, type and identifier
//! 3. **Batch**: Accumulates index operations
//! 4. **Submitter**: Executes a batch and classifies the outcome
//! 5. **Connection**: Owns the shared backend handle and rebuilds it on failure
//! 6. **Loader**: Decides batch boundaries and retries recoverable failures
//! 7. **Orchestrator**: Coordinates the ingest flow

pub mod batch;
pub mod classifier;
pub mod connection;
pub mod consumer;
pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod processor;
pub mod submitter;

#[cfg(test)]
mod test_support;

pub use batch::BatchAccumulator;
pub use classifier::FailureClass;
pub use connection::{ConnectionHandle, ConnectionManager, ReconnectPolicy, ReconnectingConnectionManager};
pub use errors::{ConnectionError, IngestError, SubmitError};
pub use loader::{BatchLoader, ItemFailurePolicy, LoaderConfig, LoaderStats};
pub use orchestrator::{Orchestrator, OrchestratorConfig};
pub use submitter::{BulkSubmitter, SubmissionResult, SubmissionStatus};
