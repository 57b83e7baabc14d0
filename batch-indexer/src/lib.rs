//! # Batch Indexer
//!
//! Main library for the batch indexer.
//!
//! This crate provides the entry point and configuration for running the
//! ingest pipeline over newline-delimited JSON read from stdin.

pub mod config;

pub use config::{AppConfig, Dependencies, LogFormat};

use batch_indexer_ingest::{ConnectionError, IngestError};
use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Ingest error.
    #[error("Ingest error: {0}")]
    IngestError(#[from] IngestError),

    /// Backend connection error.
    #[error("Connection error: {0}")]
    ConnectionError(#[from] ConnectionError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
