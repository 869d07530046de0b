//! Client configuration
//!
//! A [`Config`] is read from a YAML (or JSON) file, overridden from the
//! environment, and turned into the pieces the client needs: an
//! [`HttpClientConfig`], an [`AuthConfig`], a [`PagerConfig`] and a
//! [`RetryPolicy`].
//!
//! ```yaml
//! base_url: https://api.trello.com/1
//! key: 0123456789abcdef
//! token: ATTA...
//! auth_location: query
//! timeout_secs: 30
//! rate_limit:
//!   requests_per_second: 10
//!   burst_size: 10
//! retry:
//!   max_attempts: 3
//!   delay: 1500
//! ```

use crate::auth::{AuthConfig, AuthToken, Location};
use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClientConfig, RateLimiterConfig, RetryPolicy};
use crate::pagination::PagerConfig;
use crate::types::{DEFAULT_BASE_URL, PAGE_SIZE_CEILING};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the API key
pub const ENV_KEY: &str = "TRELLO_KEY";

/// Environment variable holding the user token
pub const ENV_TOKEN: &str = "TRELLO_TOKEN";

/// Environment variable overriding the base URL
pub const ENV_BASE_URL: &str = "TRELLO_BASE_URL";

/// Client configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL for relative paths
    pub base_url: String,

    /// Application key
    pub key: Option<String>,

    /// User token
    pub token: Option<String>,

    /// Where credentials are sent
    pub auth_location: Location,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Client-side rate limit; `null` disables it
    pub rate_limit: Option<RateLimiterConfig>,

    /// Caller-level retry around whole fetches
    pub retry: RetryPolicy,

    /// Rows per page when paging
    pub page_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            key: None,
            token: None,
            auth_location: Location::default(),
            timeout_secs: 30,
            rate_limit: Some(RateLimiterConfig::trello()),
            retry: RetryPolicy::default(),
            page_size: PAGE_SIZE_CEILING,
        }
    }
}

impl Config {
    /// Load a config file (YAML, which also accepts JSON)
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&content)
    }

    /// Parse a config from YAML or JSON text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `TRELLO_KEY`, `TRELLO_TOKEN` and `TRELLO_BASE_URL` from the process environment
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_env_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    #[must_use]
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(ENV_KEY) {
            self.key = Some(key);
        }
        if let Some(token) = non_empty(ENV_TOKEN) {
            self.token = Some(token);
        }
        if let Some(base_url) = non_empty(ENV_BASE_URL) {
            self.base_url = base_url;
        }
        self
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::InvalidConfigValue {
                field: "base_url".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.page_size == 0 || self.page_size > PAGE_SIZE_CEILING {
            return Err(Error::InvalidConfigValue {
                field: "page_size".to_string(),
                message: format!("must be between 1 and {PAGE_SIZE_CEILING}"),
            });
        }
        if self.retry.max_attempts == 0 {
            return Err(Error::InvalidConfigValue {
                field: "retry.max_attempts".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// HTTP client settings
    pub fn http_config(&self) -> HttpClientConfig {
        let builder = HttpClientConfig::builder()
            .base_url(&self.base_url)
            .timeout(Duration::from_secs(self.timeout_secs));
        let builder = match &self.rate_limit {
            Some(limit) => builder.rate_limit(limit.clone()),
            None => builder.no_rate_limit(),
        };
        builder.build()
    }

    /// Credentials, if a token is configured
    pub fn auth_config(&self) -> AuthConfig {
        match &self.token {
            Some(token) => AuthConfig::Token {
                token: AuthToken {
                    key: self.key.clone(),
                    token: token.clone(),
                },
                location: self.auth_location,
            },
            None => AuthConfig::None,
        }
    }

    /// Credentials, failing when no token is configured
    pub fn require_auth(&self) -> Result<AuthConfig> {
        match self.auth_config() {
            AuthConfig::None => Err(Error::missing_field("token")),
            auth => Ok(auth),
        }
    }

    /// Pager settings
    pub fn pager_config(&self) -> PagerConfig {
        PagerConfig::new().with_page_size(self.page_size)
    }
}
