//! HTTP client: the request executor
//!
//! Sends one authenticated GET per call and converts the response into a
//! [`Page`]. Failures are classified, never retried here:
//! - non-2xx status -> [`Error::HttpStatus`]
//! - non-JSON content type -> [`Error::Format`]
//! - connection problems -> [`Error::Transport`]

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::auth::{AuthConfig, Authenticator};
use crate::error::{Error, Result};
use crate::flatten::{Flattener, Page};
use crate::query::Query;
use crate::types::DEFAULT_BASE_URL;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL that relative paths are joined onto
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            rate_limit: Some(RateLimiterConfig::trello()),
            default_headers: HashMap::new(),
            user_agent: format!("trello-fetch/{}", env!("CARGO_PKG_VERSION")),
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
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
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

/// HTTP client for authenticated single-page GETs
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    authenticator: Authenticator,
    rate_limiter: Option<RateLimiter>,
    flattener: Flattener,
}

impl HttpClient {
    /// Create a client with default configuration and no credentials
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            authenticator: Authenticator::default(),
            rate_limiter,
            flattener: Flattener::default(),
        })
    }

    /// Create a client with authentication
    pub fn with_auth(config: HttpClientConfig, auth_config: AuthConfig) -> Result<Self> {
        let mut client = Self::with_config(config)?;
        client.set_authenticator(auth_config);
        Ok(client)
    }

    /// Set the authenticator
    pub fn set_authenticator(&mut self, auth_config: AuthConfig) {
        self.authenticator = Authenticator::new(auth_config);
    }

    /// Replace the flattener used for response bodies
    #[must_use]
    pub fn with_flattener(mut self, flattener: Flattener) -> Self {
        self.flattener = flattener;
        self
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Fetch one page: a single GET whose JSON body is flattened.
    ///
    /// `limit` defaults to the page-size ceiling. An empty result is not an
    /// error; it yields an empty table and an "empty response" event.
    pub async fn fetch_page(&self, url: &str, query: &Query) -> Result<Page> {
        let response = self.get(url, query).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.text().await.map_err(reqwest::Error::without_url)?;

        if !is_json(&content_type) {
            warn!(url = %url, content_type = %content_type, "Response is not JSON");
            return Err(Error::format(content_type, &body));
        }

        let page = self.flattener.decode(&body)?;

        match page.row_count() {
            Some(0) => info!(url = %url, "empty response"),
            Some(rows) => debug!(url = %url, rows, "Fetched tabular page"),
            None => debug!(url = %url, "Fetched non-tabular page"),
        }

        Ok(page)
    }

    /// Send one authenticated GET and fail on a non-2xx status
    pub async fn get(&self, url: &str, query: &Query) -> Result<Response> {
        let full_url = self.build_url(url)?;

        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        let mut req = self.client.get(full_url.clone());

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        req = req.query(&query.to_pairs());
        req = self.authenticator.apply(req);

        debug!(url = %full_url, query = ?query, "GET");
        // The sent URL may carry key/token; keep it out of error messages
        let response = req.send().await.map_err(reqwest::Error::without_url)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(url = %full_url, status = status.as_u16(), "Request failed");
            return Err(Error::http_status(
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
                &body,
            ));
        }

        debug!(url = %full_url, status = status.as_u16(), "Request succeeded");
        Ok(response)
    }

    /// Build full URL from an absolute URL or a path relative to the base URL
    pub fn build_url(&self, path: &str) -> Result<Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(Url::parse(path)?);
        }

        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("authenticated", &self.authenticator.config().is_authenticated())
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Check if a content type declares JSON (`application/json`, `...+json`)
fn is_json(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|mime| mime.trim().to_ascii_lowercase())
        .is_some_and(|mime| mime == "application/json" || mime.ends_with("+json"))
}

#[cfg(test)]
mod content_type_tests {
    use super::is_json;
    use test_case::test_case;

    #[test_case("application/json", true ; "plain json")]
    #[test_case("application/json; charset=utf-8", true ; "json with charset")]
    #[test_case("Application/JSON", true ; "mixed case")]
    #[test_case("application/vnd.api+json", true ; "json suffix")]
    #[test_case("text/html; charset=utf-8", false ; "html")]
    #[test_case("text/plain", false ; "plain text")]
    #[test_case("", false ; "missing")]
    fn test_is_json(content_type: &str, expected: bool) {
        assert_eq!(is_json(content_type), expected);
    }
}
