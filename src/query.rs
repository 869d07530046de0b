//! Request query parameters
//!
//! A [`Query`] holds the parameters of one GET request. Two of them are
//! managed by the crate: `limit`, which defaults to and is capped at
//! [`PAGE_SIZE_CEILING`], and `before`, the paging cursor. Everything else
//! is passed through to the API as given.

use crate::types::{StringMap, BEFORE_PARAM, LIMIT_PARAM, PAGE_SIZE_CEILING};
use tracing::warn;

/// Query parameters for a single request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    limit: Option<u32>,
    before: Option<String>,
    params: StringMap,
}

impl Query {
    /// Create an empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter.
    ///
    /// `limit` and `before` are routed to their managed slots; a `limit`
    /// that is not a non-negative integer is ignored with a warning.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Set the page size
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the paging cursor
    #[must_use]
    pub fn before(mut self, id: impl Into<String>) -> Self {
        self.before = Some(id.into());
        self
    }

    /// Add or replace a parameter in place
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match key.as_str() {
            LIMIT_PARAM => match value.trim().parse::<u32>() {
                Ok(limit) => self.limit = Some(limit),
                Err(_) => warn!(value = %value, "Ignoring non-numeric limit"),
            },
            BEFORE_PARAM => self.before = Some(value),
            _ => {
                self.params.insert(key, value);
            }
        }
    }

    /// Replace the paging cursor
    pub fn set_before(&mut self, id: impl Into<String>) {
        self.before = Some(id.into());
    }

    /// Replace the page size
    pub fn set_limit(&mut self, limit: u32) {
        self.limit = Some(limit);
    }

    /// The page size sent with the request: the requested limit, or the
    /// ceiling when unset, never above the ceiling
    pub fn effective_limit(&self) -> u32 {
        match self.limit {
            Some(limit) if limit > PAGE_SIZE_CEILING => {
                warn!(
                    requested = limit,
                    ceiling = PAGE_SIZE_CEILING,
                    "Requested limit exceeds the API maximum, capping"
                );
                PAGE_SIZE_CEILING
            }
            Some(limit) => limit,
            None => PAGE_SIZE_CEILING,
        }
    }

    /// Current paging cursor
    pub fn cursor(&self) -> Option<&str> {
        self.before.as_deref()
    }

    /// Look up a passthrough parameter
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// All parameters as they go on the wire
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        pairs.push((LIMIT_PARAM.to_string(), self.effective_limit().to_string()));
        if let Some(before) = &self.before {
            pairs.push((BEFORE_PARAM.to_string(), before.clone()));
        }
        pairs
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = Query::new();
        for (key, value) in iter {
            query.set(key, value);
        }
        query
    }
}
