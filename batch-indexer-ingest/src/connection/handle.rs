//! Lease on the live backend client.

use std::fmt;
use std::sync::Arc;

use batch_indexer_repository::BackendClient;

/// A lease on the backend client that was live when it was acquired.
///
/// Handles are cheap to clone and never change: a reconnect produces a new
/// handle with a higher generation. Acquire a fresh handle for every
/// submission instead of keeping one across calls.
#[derive(Clone)]
pub struct ConnectionHandle {
    client: Arc<dyn BackendClient>,
    generation: u64,
}

impl ConnectionHandle {
    /// Wrap a client with the generation it was created in.
    pub fn new(client: Arc<dyn BackendClient>, generation: u64) -> Self {
        Self { client, generation }
    }

    /// The backend client.
    pub fn client(&self) -> &dyn BackendClient {
        self.client.as_ref()
    }

    /// Reconnect count at the time this client was built. Starts at 1.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}
