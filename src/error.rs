//! Error types for trello-fetch
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use crate::flatten::{Page, Table};
use thiserror::Error;

/// Maximum number of characters of a response body kept in an error
pub const MAX_ERROR_BODY_CHARS: usize = 500;

/// The main error type for trello-fetch
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status} {reason}: {body}")]
    HttpStatus {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("Expected a JSON response but got '{content_type}': {body}")]
    Format { content_type: String, body: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Paging Errors
    // ============================================================================
    #[error(transparent)]
    Merge(Box<MergeError>),

    // ============================================================================
    // Arrow/Parquet Errors
    // ============================================================================
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

/// A page that could not be merged into the rows accumulated so far.
///
/// Both halves are kept so the caller can salvage whatever was fetched
/// before the incompatible page arrived.
#[derive(Error, Debug)]
#[error("Cannot merge page {page_number} into {} accumulated rows: {reason}", .partial.len())]
pub struct MergeError {
    /// Rows accumulated from all pages before the failing one
    pub partial: Table,
    /// The page that failed to merge
    pub page: Page,
    /// 1-based number of the failing page
    pub page_number: usize,
    /// Why the page could not be merged
    pub reason: String,
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an HTTP status error, truncating the body
    pub fn http_status(status: u16, reason: impl Into<String>, body: &str) -> Self {
        Self::HttpStatus {
            status,
            reason: reason.into(),
            body: truncate_body(body),
        }
    }

    /// Create a format error, truncating the body
    pub fn format(content_type: impl Into<String>, body: &str) -> Self {
        Self::Format {
            content_type: content_type.into(),
            body: truncate_body(body),
        }
    }

    /// Create a merge error
    pub fn merge(partial: Table, page: Page, page_number: usize, reason: impl Into<String>) -> Self {
        Self::Merge(Box::new(MergeError {
            partial,
            page,
            page_number,
            reason: reason.into(),
        }))
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// HTTP status code, if this is an HTTP status error
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            Error::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this error is worth retrying at the caller level
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Keep at most [`MAX_ERROR_BODY_CHARS`] characters of a response body
pub fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

/// Result type alias for trello-fetch
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("token");
        assert_eq!(err.to_string(), "Missing required config field: token");

        let err = Error::http_status(404, "Not Found", "model not found");
        assert_eq!(err.to_string(), "HTTP 404 Not Found: model not found");

        let err = Error::format("text/html", "<html></html>");
        assert_eq!(
            err.to_string(),
            "Expected a JSON response but got 'text/html': <html></html>"
        );
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(truncate_body("short"), "short");

        let long = "x".repeat(MAX_ERROR_BODY_CHARS + 20);
        let truncated = truncate_body(&long);
        assert_eq!(truncated.len(), MAX_ERROR_BODY_CHARS + 3);
        assert!(truncated.ends_with("..."));

        // Multi-byte characters are never split
        let unicode = "é".repeat(MAX_ERROR_BODY_CHARS + 1);
        assert!(truncate_body(&unicode).starts_with('é'));
    }

    #[test]
    fn test_http_status_truncates_body() {
        let err = Error::http_status(500, "Internal Server Error", &"e".repeat(2000));
        match err {
            Error::HttpStatus { body, .. } => assert!(body.len() < 2000),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::http_status(429, "", "").is_retryable());
        assert!(Error::http_status(500, "", "").is_retryable());
        assert!(Error::http_status(503, "", "").is_retryable());

        assert!(!Error::http_status(400, "", "").is_retryable());
        assert!(!Error::http_status(401, "", "").is_retryable());
        assert!(!Error::http_status(404, "", "").is_retryable());
        assert!(!Error::format("text/html", "").is_retryable());
        assert!(!Error::config("test").is_retryable());
    }

    #[test]
    fn test_status() {
        assert_eq!(Error::http_status(401, "Unauthorized", "").status(), Some(401));
        assert_eq!(Error::config("x").status(), None);
    }

    #[test]
    fn test_merge_error_keeps_both_halves() {
        let partial = Table::from_records(vec![json!({"id": "a"})]);
        let err = Error::merge(partial, Page::Raw(json!({"id": "b"})), 2, "not tabular");

        assert_eq!(
            err.to_string(),
            "Cannot merge page 2 into 1 accumulated rows: not tabular"
        );
        match err {
            Error::Merge(failure) => {
                assert_eq!(failure.partial.len(), 1);
                assert!(matches!(failure.page, Page::Raw(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
