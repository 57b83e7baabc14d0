//! Message types for the consumer.

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc};

use crate::errors::IngestError;
use batch_indexer_shared::IndexEvent;

/// Message sent from an event source to the orchestrator.
#[derive(Debug, Clone)]
pub enum StreamMessage {
    /// Decoded events, in source order.
    Events(Vec<IndexEvent>),
    /// The source hit an error but keeps running.
    Error(String),
    /// The source is exhausted or was shut down.
    End,
}

/// A source of index events.
///
/// Offsets and acknowledgements belong to the source; the orchestrator only
/// sees decoded events.
#[async_trait]
pub trait EventSource: Send {
    /// Read events until the source ends or `shutdown` fires, forwarding
    /// them through `sender`. Implementations send `StreamMessage::End`
    /// when they stop cleanly, and return `Err` without it when the source
    /// itself failed.
    async fn run(
        self: Box<Self>,
        sender: mpsc::Sender<StreamMessage>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), IngestError>;
}
