//! Consumer module for the batch indexer ingest.
//!
//! Event sources read upstream data and forward decoded events to the
//! orchestrator through a channel.

mod line_consumer;
mod messages;

pub use line_consumer::LineConsumer;
pub use messages::{EventSource, StreamMessage};
