//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `BackendClient`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    auth::Credentials,
    cluster::ClusterHealthParts,
    http::request::JsonBody,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    BulkParts, OpenSearch,
};
use serde_json::Value;
use tracing::{debug, error, info};
use url::Url;

use crate::config::BackendConfig;
use crate::errors::BackendError;
use crate::interfaces::BackendClient;
use crate::opensearch::bulk::render_body;
use crate::types::BulkResponse;
use batch_indexer_shared::PendingOperation;

/// OpenSearch backend client.
///
/// # Example
///
/// ```ignore
/// let config = BackendConfig::new("http://localhost:9200");
/// let backend = OpenSearchBackend::new(&config)?;
/// backend.ping().await?;
///
/// let ops = vec![PendingOperation::new("events", "event", "id-1", r#"{"a":1}"#)];
/// let response = backend.execute_bulk(&ops).await?;
/// ```
pub struct OpenSearchBackend {
    client: OpenSearch,
    send_document_type: bool,
}

impl OpenSearchBackend {
    /// Create a new OpenSearch client for the configured URL.
    ///
    /// No request is sent; use [`OpenSearchBackend::ping`] to verify the
    /// cluster answers.
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchBackend)` - A new client instance
    /// * `Err(BackendError::ConfigError)` - If the URL or transport is invalid
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let parsed_url = Url::parse(&config.url).map_err(|e| BackendError::config(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let mut builder = TransportBuilder::new(conn_pool)
            .timeout(config.request_timeout)
            .disable_proxy();
        if let Some(ref credentials) = config.credentials {
            builder = builder.auth(Credentials::Basic(
                credentials.username.clone(),
                credentials.password.clone(),
            ));
        }
        let transport = builder
            .build()
            .map_err(|e| BackendError::config(e.to_string()))?;

        info!(
            url = %config.url,
            timeout_ms = config.request_timeout.as_millis() as u64,
            authenticated = config.credentials.is_some(),
            "Created OpenSearch client"
        );

        Ok(Self {
            client: OpenSearch::new(transport),
            send_document_type: config.send_document_type,
        })
    }

    /// Verify the cluster answers at all.
    pub async fn ping(&self) -> Result<(), BackendError> {
        let response = self
            .client
            .ping()
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status_code();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::from_status(status.as_u16(), body));
        }
        Ok(())
    }
}

/// Map a failed send into a backend error.
fn map_transport_error(e: opensearch::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::timeout(e.to_string())
    } else {
        BackendError::unreachable(e.to_string())
    }
}

#[async_trait]
impl BackendClient for OpenSearchBackend {
    async fn execute_bulk(
        &self,
        operations: &[PendingOperation],
    ) -> Result<BulkResponse, BackendError> {
        let body: Vec<JsonBody<Value>> = render_body(operations, self.send_document_type)?
            .into_iter()
            .map(JsonBody::new)
            .collect();

        let response = self
            .client
            .bulk(BulkParts::None)
            .body(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(BackendError::from_status(status.as_u16(), error_body));
        }

        let response_body = response
            .json::<Value>()
            .await
            .map_err(|e| BackendError::parse(e.to_string()))?;
        let bulk_response = BulkResponse::from_json(&response_body)?;

        debug!(
            count = operations.len(),
            took_ms = bulk_response.took,
            errors = bulk_response.errors,
            "Bulk request completed"
        );
        Ok(bulk_response)
    }

    async fn health_check(&self) -> Result<bool, BackendError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status_code();
        if !status.is_success() {
            return Ok(false);
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| BackendError::parse(e.to_string()))?;

        Ok(is_healthy_status(&body))
    }
}

/// Green and yellow clusters accept writes.
fn is_healthy_status(body: &Value) -> bool {
    matches!(body["status"].as_str(), Some("green") | Some("yellow"))
}
