//! Authenticator implementation
//!
//! Applies credentials to outgoing requests.

use super::types::{AuthConfig, Location};
use reqwest::RequestBuilder;

/// Query parameter carrying the application key
const KEY_PARAM: &str = "key";

/// Query parameter carrying the user token
const TOKEN_PARAM: &str = "token";

/// Authenticator handles applying authentication to HTTP requests
#[derive(Debug, Clone, Default)]
pub struct Authenticator {
    config: AuthConfig,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Get the auth configuration
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Apply authentication to a request builder
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.config {
            AuthConfig::None => req,

            AuthConfig::Token { token, location } => match location {
                Location::Query => {
                    let req = match &token.key {
                        Some(key) => req.query(&[(KEY_PARAM, key)]),
                        None => req,
                    };
                    req.query(&[(TOKEN_PARAM, &token.token)])
                }
                Location::Header => {
                    let value = match &token.key {
                        Some(key) => format!(
                            "OAuth oauth_consumer_key=\"{key}\", oauth_token=\"{}\"",
                            token.token
                        ),
                        None => format!("OAuth oauth_token=\"{}\"", token.token),
                    };
                    req.header(reqwest::header::AUTHORIZATION, value)
                }
            },

            AuthConfig::Bearer { token } => req.bearer_auth(token),
        }
    }
}
