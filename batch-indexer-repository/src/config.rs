//! Configuration types for the search backend.

use std::time::Duration;

/// Default backend URL.
pub const DEFAULT_URL: &str = "http://localhost:9200";

/// Default request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Username and password for HTTP basic authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

/// Configuration for connecting to the search backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Backend URL (e.g. "http://localhost:9200").
    pub url: String,
    /// Optional basic authentication.
    pub credentials: Option<BasicCredentials>,
    /// Timeout applied to every request.
    pub request_timeout: Duration,
    /// Whether to send `_type` in bulk action lines.
    /// Only legacy clusters accept document types.
    pub send_document_type: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            credentials: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            send_document_type: false,
        }
    }
}

impl BackendConfig {
    /// Create a config for the given URL with default settings.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Use basic authentication.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some(BasicCredentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// Set the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Send document types in bulk action lines.
    pub fn with_document_type(mut self, send_document_type: bool) -> Self {
        self.send_document_type = send_document_type;
        self
    }
}
