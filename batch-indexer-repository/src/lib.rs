//! # Batch Indexer Repository
//!
//! This crate defines the narrow contract the batch indexer uses to talk to
//! the search backend: a request builder, a bulk-capable client and a
//! connector that produces fresh clients. It also provides the concrete
//! OpenSearch implementation of that contract.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod request;
pub mod types;

pub use config::{BackendConfig, BasicCredentials};
pub use errors::{BackendError, RequestError};
pub use interfaces::{BackendClient, BackendConnector, RequestBuilder};
pub use opensearch::{OpenSearchBackend, OpenSearchConnector};
pub use request::JsonRequestBuilder;
pub use types::{BulkItemResponse, BulkResponse, ItemError};
