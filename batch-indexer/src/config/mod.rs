//! Configuration and dependency wiring for the batch indexer.

mod app_config;
mod dependencies;

pub use app_config::{AppConfig, LogFormat};
pub use dependencies::Dependencies;
