//! Dependency initialization and wiring for the batch indexer.

use std::sync::Arc;

use tokio::io::{stdin, BufReader};
use tracing::info;

use crate::config::AppConfig;
use crate::IndexingError;
use batch_indexer_ingest::consumer::LineConsumer;
use batch_indexer_ingest::processor::EventResolver;
use batch_indexer_ingest::{BatchLoader, Orchestrator, ReconnectingConnectionManager};
use batch_indexer_repository::{JsonRequestBuilder, OpenSearchConnector};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
}

impl Dependencies {
    /// Initialize all dependencies from the given configuration.
    ///
    /// Connects to the backend eagerly so a misconfigured cluster fails at
    /// startup rather than on the first flush.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If the backend is unreachable or unhealthy
    pub async fn new(config: &AppConfig) -> Result<Self, IndexingError> {
        info!(
            opensearch_url = %config.backend.url,
            authenticated = config.backend.credentials.is_some(),
            batch_size = config.loader.batch_size,
            item_failure_policy = ?config.loader.item_failure_policy,
            "Initializing dependencies"
        );

        let connector = Arc::new(OpenSearchConnector::new(config.backend.clone()));
        let connections =
            Arc::new(ReconnectingConnectionManager::connect(connector, config.reconnect).await?);

        info!("OpenSearch connection established");

        let loader = BatchLoader::with_config(
            Arc::new(JsonRequestBuilder::new()),
            connections,
            EventResolver::new(config.resolver.clone()),
            config.loader.clone(),
        );

        if !loader.health_check().await? {
            return Err(IndexingError::config("OpenSearch cluster is unhealthy"));
        }

        info!("OpenSearch connection verified");

        let source = Box::new(LineConsumer::new(BufReader::new(stdin())));
        let orchestrator = Orchestrator::new(source, loader);

        Ok(Self { orchestrator })
    }
}
