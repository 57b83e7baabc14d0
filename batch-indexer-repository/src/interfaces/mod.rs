//! Interface definitions for the search backend.
//!
//! These traits are the seams between the batch indexer core and the backend,
//! allowing the OpenSearch implementation to be swapped for mocks in tests.

mod backend_client;
mod request_builder;

pub use backend_client::{BackendClient, BackendConnector};
pub use request_builder::RequestBuilder;
