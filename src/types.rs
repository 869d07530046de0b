//! Common types used throughout trello-fetch
//!
//! Shared type aliases and API-wide constants.

use std::collections::BTreeMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// Query parameters that are passed through to the API untouched
pub type StringMap = BTreeMap<String, String>;

// ============================================================================
// API Constants
// ============================================================================

/// Base URL of the Trello REST API
pub const DEFAULT_BASE_URL: &str = "https://api.trello.com/1";

/// Largest `limit` the API accepts for a single request
pub const PAGE_SIZE_CEILING: u32 = 1000;

/// Query parameter carrying the page size
pub const LIMIT_PARAM: &str = "limit";

/// Query parameter carrying the paging cursor
pub const BEFORE_PARAM: &str = "before";

/// Field holding a record's identifier
pub const ID_FIELD: &str = "id";

/// Field holding a record's timestamp (actions, comments)
pub const DATE_FIELD: &str = "date";
