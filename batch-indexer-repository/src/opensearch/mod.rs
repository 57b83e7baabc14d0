//! OpenSearch implementation of the backend contract.
//!
//! This module provides concrete implementations of `BackendClient` and
//! `BackendConnector` using OpenSearch as the backend.

mod bulk;
mod client;
mod connector;
#[cfg(test)]
mod test_server;

pub use client::OpenSearchBackend;
pub use connector::OpenSearchConnector;
