// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # trello-fetch
//!
//! Authenticated GET access to the Trello REST API, with optional
//! cursor paging and flattening of JSON responses into tables.
//!
//! ## Features
//!
//! - **Request executor**: one authenticated GET per call, `limit` always sent
//! - **Cursor paging**: walks list endpoints backwards with `before=<id>`
//! - **Flattening**: nested objects and arrays become dotted columns
//! - **Arrow output**: tables convert to RecordBatches and Parquet files
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use trello_fetch::{AuthConfig, AuthToken, HttpClient, HttpClientConfig, Pager, Query, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let auth = AuthConfig::query(AuthToken::new("my-key", "my-token"));
//!     let client = HttpClient::with_auth(HttpClientConfig::default(), auth)?;
//!
//!     let query = Query::new().param("filter", "createCard");
//!     let page = Pager::new(&client)
//!         .fetch_all("boards/5f0c.../actions", &query, true)
//!         .await?;
//!
//!     println!("{} rows", page.row_count().unwrap_or(0));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 Pager::fetch_all(url, query)             │
//! │   limit=page_size, before=<oldest id> until short page   │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────────────────────────────────────────────────────┐
//! │              HttpClient::fetch_page(url, query)          │
//! │   rate limit → auth → GET → status/content-type checks   │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//! ┌────────────┬───────────────┴──────────┬──────────────────┐
//! │    Auth    │        Flatten           │     Output       │
//! ├────────────┼──────────────────────────┼──────────────────┤
//! │ key/token  │ a.b.c columns            │ JSON lines       │
//! │ OAuth hdr  │ list index columns       │ Arrow / Parquet  │
//! └────────────┴──────────────────────────┴──────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and constants
pub mod types;

/// Query parameters with paging-aware `limit` and `before`
pub mod query;

/// Credential handling
pub mod auth;

/// HTTP client with rate limiting and caller-level retry
pub mod http;

/// JSON flattening into tables
pub mod flatten;

/// Cursor paging over list endpoints
pub mod pagination;

/// Arrow/Parquet and JSON output
pub mod output;

/// Configuration file and environment
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, MergeError, Result};
pub use types::*;

// Re-export commonly used types
pub use auth::{AuthConfig, AuthToken};
pub use config::Config;
pub use flatten::{Page, Table};
pub use http::{HttpClient, HttpClientConfig, RetryPolicy};
pub use pagination::{Pager, PagerConfig};
pub use query::Query;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
