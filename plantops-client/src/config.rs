//! Client configuration

/// Configuration for connecting to the remote data service
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Data service endpoint (e.g., "https://example.org/data")
    pub endpoint: String,

    /// Bearer token sent with every request
    pub token: Option<String>,

    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: None,
            timeout_ms: 30_000,
        }
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Create an HTTP data service from this configuration
    pub fn build_http_service(&self) -> crate::ClientResult<crate::HttpDataService> {
        crate::HttpDataService::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080/data")
    }
}
