//! Connection manager trait and reconnecting implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::connection::ConnectionHandle;
use crate::errors::ConnectionError;
use batch_indexer_repository::{BackendClient, BackendConnector, BackendError};

/// Owner of the live backend connection.
///
/// # Thread Safety
///
/// Implementations are shared between workers. `reinitialize` must be
/// mutually exclusive with `handle`: a caller asking for the handle while a
/// reconnect is in progress waits for the new client.
#[async_trait]
pub trait ConnectionManager: Send + Sync {
    /// Return the current live handle.
    ///
    /// # Returns
    ///
    /// * `Ok(ConnectionHandle)` - The live handle
    /// * `Err(ConnectionError::Unavailable)` - If no backend was ever reached
    async fn handle(&self) -> Result<ConnectionHandle, ConnectionError>;

    /// Tear down the current connection and build a new one.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - A new handle is live
    /// * `Err(ConnectionError)` - Reconnecting failed; the caller must treat
    ///   this as fatal
    async fn reinitialize(&self) -> Result<(), ConnectionError>;

    /// Reinitialize because the handle of `failed_generation` failed.
    ///
    /// Callers that saw the same handle fail concurrently pass the same
    /// generation; once one of them has replaced it, the others return
    /// without reconnecting again. Pass 0 when no handle was obtained.
    async fn reinitialize_from(&self, failed_generation: u64) -> Result<(), ConnectionError> {
        let _ = failed_generation;
        self.reinitialize().await
    }
}

/// How hard to try when rebuilding a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Number of connect attempts before giving up. At least one attempt is
    /// always made.
    pub max_attempts: u32,
    /// Pause between attempts.
    pub delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_secs(2),
        }
    }
}

impl ReconnectPolicy {
    /// Create a policy.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

#[derive(Default)]
struct ConnectionState {
    current: Option<ConnectionHandle>,
    generation: u64,
}

/// Connection manager that rebuilds clients through a [`BackendConnector`].
///
/// The handle lives behind an async `RwLock`. `handle` takes the read side;
/// `reinitialize` holds the write side for the whole reconnect, including the
/// pauses between attempts, so nobody observes a half-replaced client.
pub struct ReconnectingConnectionManager {
    connector: Arc<dyn BackendConnector>,
    policy: ReconnectPolicy,
    state: RwLock<ConnectionState>,
}

impl ReconnectingConnectionManager {
    /// Create a manager without connecting. `handle` fails with
    /// `Unavailable` until the first successful `reinitialize`.
    pub fn new(connector: Arc<dyn BackendConnector>, policy: ReconnectPolicy) -> Self {
        Self {
            connector,
            policy,
            state: RwLock::new(ConnectionState::default()),
        }
    }

    /// Create a manager and establish the first connection.
    pub async fn connect(
        connector: Arc<dyn BackendConnector>,
        policy: ReconnectPolicy,
    ) -> Result<Self, ConnectionError> {
        let manager = Self::new(connector, policy);
        manager.reinitialize().await?;
        Ok(manager)
    }

    /// Number of clients built so far.
    pub async fn generation(&self) -> u64 {
        self.state.read().await.generation
    }

    /// Replace the handle held in the locked `state`.
    async fn replace(&self, state: &mut ConnectionState) -> Result<(), ConnectionError> {
        if let Some(previous) = state.current.take() {
            info!(generation = previous.generation(), "Closing backend connection");
            previous.client().close().await;
        }

        let client = self.connect_with_retry().await?;
        state.generation += 1;
        state.current = Some(ConnectionHandle::new(client, state.generation));

        info!(generation = state.generation, "Backend connection established");
        Ok(())
    }

    async fn connect_with_retry(&self) -> Result<Arc<dyn BackendClient>, ConnectionError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            match self.connector.connect().await {
                Ok(client) => {
                    if attempt > 1 {
                        info!(attempt = attempt, "Backend connection succeeded after retry");
                    }
                    return Ok(client);
                }
                Err(BackendError::Authentication(msg)) => {
                    error!(error = %msg, "Backend rejected credentials");
                    return Err(ConnectionError::Authentication(msg));
                }
                Err(e) => {
                    last_error = e.to_string();
                    if attempt < max_attempts {
                        warn!(
                            attempt = attempt,
                            max_attempts = max_attempts,
                            delay_ms = self.policy.delay.as_millis() as u64,
                            error = %last_error,
                            "Backend connection failed, retrying"
                        );
                        tokio::time::sleep(self.policy.delay).await;
                    }
                }
            }
        }

        error!(
            attempts = max_attempts,
            error = %last_error,
            "Giving up on backend connection"
        );
        Err(ConnectionError::reconnect_failed(max_attempts, last_error))
    }
}

#[async_trait]
impl ConnectionManager for ReconnectingConnectionManager {
    async fn handle(&self) -> Result<ConnectionHandle, ConnectionError> {
        self.state
            .read()
            .await
            .current
            .clone()
            .ok_or_else(|| ConnectionError::unavailable("no backend connection has been established"))
    }

    async fn reinitialize(&self) -> Result<(), ConnectionError> {
        let mut state = self.state.write().await;
        self.replace(&mut state).await
    }

    async fn reinitialize_from(&self, failed_generation: u64) -> Result<(), ConnectionError> {
        let mut state = self.state.write().await;

        if state.current.is_some() && state.generation > failed_generation {
            debug!(
                failed_generation = failed_generation,
                generation = state.generation,
                "Connection already replaced"
            );
            return Ok(());
        }

        self.replace(&mut state).await
    }
}
