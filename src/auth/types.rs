//! Auth configuration types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Location for credential placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// `Authorization: OAuth ...` header
    Header,
    /// `key` and `token` query parameters
    #[default]
    Query,
}

/// Trello API credentials: an application key and a user token.
///
/// `Debug` output never contains the secrets.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken {
    /// Application (consumer) key
    pub key: Option<String>,
    /// User token
    pub token: String,
}

impl AuthToken {
    /// Credentials with both key and token
    pub fn new(key: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            token: token.into(),
        }
    }

    /// Credentials consisting of a token only
    pub fn token_only(token: impl Into<String>) -> Self {
        Self {
            key: None,
            token: token.into(),
        }
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthToken")
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthConfig {
    /// No authentication (public boards only)
    #[default]
    None,

    /// Trello key/token credentials
    Token {
        /// The credentials
        token: AuthToken,
        /// Where to place them
        location: Location,
    },

    /// Bearer token authentication
    Bearer {
        /// The bearer token
        token: String,
    },
}

impl AuthConfig {
    /// Key/token credentials sent as query parameters
    pub fn query(token: AuthToken) -> Self {
        Self::Token {
            token,
            location: Location::Query,
        }
    }

    /// Key/token credentials sent in an OAuth `Authorization` header
    pub fn header(token: AuthToken) -> Self {
        Self::Token {
            token,
            location: Location::Header,
        }
    }

    /// Check if any credentials are configured
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Self::None)
    }
}

#[cfg(test)]
mod type_tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let token = AuthToken::new("app-key", "user-secret");
        let debug = format!("{token:?}");
        assert!(!debug.contains("app-key"));
        assert!(!debug.contains("user-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_auth_config_default() {
        let config = AuthConfig::default();
        assert!(matches!(config, AuthConfig::None));
        assert!(!config.is_authenticated());
    }

    #[test]
    fn test_location_default_is_query() {
        assert_eq!(Location::default(), Location::Query);
    }
}
