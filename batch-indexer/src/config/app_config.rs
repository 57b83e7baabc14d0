//! Environment configuration for the batch indexer.

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use crate::IndexingError;
use batch_indexer_ingest::processor::ResolverConfig;
use batch_indexer_ingest::{ItemFailurePolicy, LoaderConfig, ReconnectPolicy};
use batch_indexer_repository::BackendConfig;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// Read `LOG_FORMAT` from the environment. Anything but `json` is text.
    pub fn from_env() -> Self {
        Self::parse(env::var("LOG_FORMAT").ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub reconnect: ReconnectPolicy,
    pub loader: LoaderConfig,
    pub resolver: ResolverConfig,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `OPENSEARCH_USERNAME` / `OPENSEARCH_PASSWORD`: basic auth, both required to enable it
    /// - `OPENSEARCH_TIMEOUT_MS`: request timeout (default: 30000)
    /// - `OPENSEARCH_SEND_TYPE`: send `_type` in bulk actions (default: false)
    /// - `RECONNECT_MAX_ATTEMPTS`, `RECONNECT_DELAY_MS`: reconnect policy
    /// - `BATCH_SIZE`, `FLUSH_INTERVAL_MS`, `MAX_RETRIES`,
    ///   `INITIAL_RETRY_DELAY_MS`, `MAX_RETRY_DELAY_MS`: loader settings
    /// - `ITEM_FAILURE_POLICY`: `drop` or `abort` (default: drop)
    /// - `DEFAULT_INDEX`, `DEFAULT_TYPE`, `INDEX_DATE_SUFFIX`: event defaults
    /// - `LOG_FORMAT`: `json` or text
    ///
    /// # Returns
    ///
    /// * `Ok(AppConfig)` - Parsed configuration
    /// * `Err(IndexingError::ConfigError)` - If a value cannot be parsed
    pub fn from_env() -> Result<Self, IndexingError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, IndexingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_defaults = BackendConfig::default();
        let reconnect_defaults = ReconnectPolicy::default();
        let loader_defaults = LoaderConfig::default();
        let resolver_defaults = ResolverConfig::default();

        let mut backend = BackendConfig::new(
            lookup("OPENSEARCH_URL").unwrap_or(backend_defaults.url),
        )
        .with_request_timeout(Duration::from_millis(parse_var(
            &lookup,
            "OPENSEARCH_TIMEOUT_MS",
            backend_defaults.request_timeout.as_millis() as u64,
        )?))
        .with_document_type(parse_bool(&lookup, "OPENSEARCH_SEND_TYPE", false)?);

        if let (Some(username), Some(password)) =
            (lookup("OPENSEARCH_USERNAME"), lookup("OPENSEARCH_PASSWORD"))
        {
            backend = backend.with_credentials(username, password);
        }

        let reconnect = ReconnectPolicy::new(
            parse_var(&lookup, "RECONNECT_MAX_ATTEMPTS", reconnect_defaults.max_attempts)?,
            Duration::from_millis(parse_var(
                &lookup,
                "RECONNECT_DELAY_MS",
                reconnect_defaults.delay.as_millis() as u64,
            )?),
        );

        let batch_size = parse_var(&lookup, "BATCH_SIZE", loader_defaults.batch_size)?;
        if batch_size == 0 {
            return Err(IndexingError::config("BATCH_SIZE must be greater than zero"));
        }

        let loader = LoaderConfig {
            batch_size,
            flush_interval_ms: parse_var(&lookup, "FLUSH_INTERVAL_MS", loader_defaults.flush_interval_ms)?,
            max_retries: parse_var(&lookup, "MAX_RETRIES", loader_defaults.max_retries)?,
            initial_retry_delay_ms: parse_var(
                &lookup,
                "INITIAL_RETRY_DELAY_MS",
                loader_defaults.initial_retry_delay_ms,
            )?,
            max_retry_delay_ms: parse_var(&lookup, "MAX_RETRY_DELAY_MS", loader_defaults.max_retry_delay_ms)?,
            item_failure_policy: parse_var::<_, ItemFailurePolicy>(
                &lookup,
                "ITEM_FAILURE_POLICY",
                loader_defaults.item_failure_policy,
            )?,
        };

        let resolver = ResolverConfig {
            default_index: lookup("DEFAULT_INDEX").unwrap_or(resolver_defaults.default_index),
            default_type: lookup("DEFAULT_TYPE").unwrap_or(resolver_defaults.default_type),
            index_date_suffix: parse_bool(&lookup, "INDEX_DATE_SUFFIX", resolver_defaults.index_date_suffix)?,
        };

        Ok(Self {
            backend,
            reconnect,
            loader,
            resolver,
            log_format: LogFormat::parse(lookup("LOG_FORMAT").as_deref()),
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T, IndexingError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| IndexingError::config(format!("invalid {} '{}': {}", name, raw, e))),
        None => Ok(default),
    }
}

fn parse_bool<F>(lookup: &F, name: &str, default: bool) -> Result<bool, IndexingError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name).map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) if v == "true" || v == "1" => Ok(true),
        Some(v) if v == "false" || v == "0" => Ok(false),
        Some(v) => Err(IndexingError::config(format!("invalid {} '{}': expected true or false", name, v))),
        None => Ok(default),
    }
}
