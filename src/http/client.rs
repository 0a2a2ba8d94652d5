//! HTTP client with mutual TLS and bearer authentication
//!
//! Requests are sent one at a time. There is no retry policy apart from a
//! single token refresh when the API answers `401 Unauthorized`.

use crate::auth::Authenticator;
use crate::error::{Error, Result};
use reqwest::{Client, Identity, Method, Response};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL that relative paths are joined onto
    pub base_url: Option<Url>,
    /// Request timeout
    pub timeout: Duration,
    /// Default headers for all requests
    pub default_headers: Vec<(String, String)>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            default_headers: vec![("Accept".to_string(), "application/json".to_string())],
            user_agent: format!("source-adp-workers/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: Url) -> Self {
        self.config.base_url = Some(url);
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.push((key.into(), value.into()));
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// HTTP client carrying the mTLS identity and the authenticator
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    authenticator: Option<Authenticator>,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration and no client certificate
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        Self::build(config, None)
    }

    /// Create a client that presents the given identity on every TLS handshake
    pub fn with_identity(config: HttpClientConfig, identity: Identity) -> Result<Self> {
        Self::build(config, Some(identity))
    }

    fn build(config: HttpClientConfig, identity: Option<Identity>) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent);

        if let Some(identity) = identity {
            builder = builder.identity(identity);
        }

        let client = builder
            .build()
            .map_err(|e| Error::tls(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            authenticator: None,
        })
    }

    /// Set the authenticator
    pub fn set_authenticator(&mut self, authenticator: Authenticator) {
        self.authenticator = Some(authenticator);
    }

    /// Get the authenticator, if one is set
    pub fn authenticator(&self) -> Option<&Authenticator> {
        self.authenticator.as_ref()
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Make a GET request, refreshing the token once if it is rejected
    pub async fn get(&self, url: &str) -> Result<Response> {
        self.request(Method::GET, url).await
    }

    /// Make a request, refreshing the token once if it is rejected
    pub async fn request(&self, method: Method, url: &str) -> Result<Response> {
        let full_url = self.build_url(url)?;
        let timeout = self.config.timeout;
        let mut refreshed = false;

        loop {
            let mut req = self.client.request(method.clone(), full_url.clone());

            for (key, value) in &self.config.default_headers {
                req = req.header(key.as_str(), value.as_str());
            }

            if let Some(ref auth) = self.authenticator {
                req = auth.apply(req).await?;
            }

            let response = match req.send().await {
                Ok(response) => response,
                Err(e) if e.is_timeout() => {
                    return Err(Error::Timeout {
                        timeout_ms: timeout.as_millis() as u64,
                    });
                }
                Err(e) => return Err(Error::Http(e)),
            };

            let status = response.status();
            if status.is_success() {
                debug!("Request succeeded: {} {} ({})", method, full_url, status);
                return Ok(response);
            }

            let body = response.text().await.unwrap_or_default();
            let err = Error::http_status(status.as_u16(), body);

            match self.authenticator {
                Some(ref auth) if err.is_unauthorized() && !refreshed => {
                    warn!("Request to {} returned 401, refreshing token", full_url);
                    auth.refresh().await?;
                    refreshed = true;
                }
                _ => return Err(err),
            }
        }
    }

    /// Build full URL from a path (which may carry its own query string)
    fn build_url(&self, path: &str) -> Result<Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(Url::parse(path)?);
        }

        match &self.config.base_url {
            Some(base) => Ok(base.join(path.trim_start_matches('/'))?),
            None => Err(Error::config(format!(
                "relative URL '{path}' requires a base URL"
            ))),
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("has_authenticator", &self.authenticator.is_some())
            .finish_non_exhaustive()
    }
}
