//! OpenSearch connector.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::config::BackendConfig;
use crate::errors::BackendError;
use crate::interfaces::{BackendClient, BackendConnector};
use crate::opensearch::client::OpenSearchBackend;

/// Builds fresh [`OpenSearchBackend`] clients from a fixed configuration.
///
/// Every call to `connect` creates a new transport and pings the cluster, so a
/// returned client is known to have reached the backend at least once.
#[derive(Debug, Clone)]
pub struct OpenSearchConnector {
    config: BackendConfig,
}

impl OpenSearchConnector {
    /// Create a connector for the given configuration.
    pub fn new(config: BackendConfig) -> Self {
        Self { config }
    }

    /// The configuration used for new clients.
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }
}

#[async_trait]
impl BackendConnector for OpenSearchConnector {
    async fn connect(&self) -> Result<Arc<dyn BackendClient>, BackendError> {
        let backend = OpenSearchBackend::new(&self.config)?;
        backend.ping().await?;

        debug!(url = %self.config.url, "OpenSearch cluster answered ping");
        Ok(Arc::new(backend))
    }
}
