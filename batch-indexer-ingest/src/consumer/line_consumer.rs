//! Newline-delimited JSON consumer.
//!
//! Reads one JSON event per line from any async reader (stdin in the binary).

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, instrument, warn};

use crate::consumer::messages::{EventSource, StreamMessage};
use crate::errors::IngestError;
use batch_indexer_shared::IndexEvent;

/// Event source reading newline-delimited JSON.
///
/// Blank lines are ignored. Lines that are not UTF-8 or do not decode into an
/// [`IndexEvent`] are reported as `StreamMessage::Error` and skipped. A read
/// failure of the underlying reader ends the source with an error.
pub struct LineConsumer<R> {
    reader: R,
}

impl<R> LineConsumer<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    /// Create a consumer over `reader`.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Decode one raw line. `Ok(None)` means the line was blank.
    fn decode(line: &[u8]) -> Result<Option<IndexEvent>, IngestError> {
        let text = std::str::from_utf8(line)
            .map_err(|e| IngestError::parse(format!("invalid UTF-8: {}", e)))?
            .trim();
        if text.is_empty() {
            return Ok(None);
        }
        serde_json::from_str(text)
            .map(Some)
            .map_err(|e| IngestError::parse(e.to_string()))
    }
}

#[async_trait]
impl<R> EventSource for LineConsumer<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    #[instrument(skip_all)]
    async fn run(
        self: Box<Self>,
        sender: mpsc::Sender<StreamMessage>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), IngestError> {
        let mut reader = self.reader;
        let mut buf = Vec::new();
        let mut line_number: u64 = 0;

        loop {
            buf.clear();
            tokio::select! {
                _ = shutdown.recv() => {
                    info!("Consumer received shutdown signal");
                    let _ = sender.send(StreamMessage::End).await;
                    break;
                }
                read = reader.read_until(b'\n', &mut buf) => {
                    match read {
                        Ok(0) => {
                            info!(lines = line_number, "Input stream ended");
                            let _ = sender.send(StreamMessage::End).await;
                            break;
                        }
                        Ok(_) => {
                            line_number += 1;
                            let message = match Self::decode(&buf) {
                                Ok(Some(event)) => StreamMessage::Events(vec![event]),
                                Ok(None) => continue,
                                Err(e) => {
                                    warn!(line = line_number, error = %e, "Skipping undecodable event");
                                    StreamMessage::Error(format!("line {}: {}", line_number, e))
                                }
                            };
                            if sender.send(message).await.is_err() {
                                debug!("Receiver dropped, stopping consumer");
                                break;
                            }
                        }
                        Err(e) => {
                            return Err(IngestError::consumer(format!(
                                "read failed after line {}: {}",
                                line_number, e
                            )));
                        }
                    }
                }
            }
        }

        Ok(())
    }
}
