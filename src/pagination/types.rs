//! Pagination types
//!
//! Configuration, loop state and the continue/stop decision.

use crate::types::{DATE_FIELD, ID_FIELD, PAGE_SIZE_CEILING};
use std::fmt;

/// Configuration for paged fetching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerConfig {
    /// Rows requested per page; a page this full means more may exist
    pub page_size: u32,
    /// Field holding a row's timestamp
    pub date_field: String,
    /// Field holding a row's identifier
    pub id_field: String,
    /// Stop after this many pages
    pub max_pages: Option<usize>,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE_CEILING,
            date_field: DATE_FIELD.to_string(),
            id_field: ID_FIELD.to_string(),
            max_pages: None,
        }
    }
}

impl PagerConfig {
    /// Create a config with the API defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size (capped at the API maximum)
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the field used to order rows
    #[must_use]
    pub fn with_date_field(mut self, field: impl Into<String>) -> Self {
        self.date_field = field.into();
        self
    }

    /// Set the field holding row ids
    #[must_use]
    pub fn with_id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = field.into();
        self
    }

    /// Limit the number of pages fetched
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    /// Page size actually requested
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.clamp(1, PAGE_SIZE_CEILING)
    }
}

/// Why the paging loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The page had no rows
    EmptyPage,
    /// The page had fewer rows than requested
    PartialPage,
    /// The page was not a list of records
    NonTabular,
    /// No row on a full page had a usable id and timestamp
    NoCursor,
    /// The computed cursor did not move
    CursorStalled,
    /// The configured page limit was reached
    MaxPages,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::EmptyPage => "empty page",
            Self::PartialPage => "last page reached",
            Self::NonTabular => "non-tabular response",
            Self::NoCursor => "no cursor could be computed",
            Self::CursorStalled => "cursor did not advance",
            Self::MaxPages => "page limit reached",
        };
        f.write_str(text)
    }
}

/// Result of the next page computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// Fetch another page older than this id
    Continue {
        /// Value for the `before` parameter
        before: String,
    },
    /// No more pages
    Done(StopReason),
}

/// Tracks pagination state during iteration
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Pages fetched so far
    pub pages: usize,
    /// Current cursor value
    pub cursor: Option<String>,
    /// Total rows merged so far
    pub total_fetched: u64,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a fetched page
    pub fn add_page(&mut self) {
        self.pages += 1;
    }

    /// Set cursor
    pub fn set_cursor(&mut self, cursor: String) {
        self.cursor = Some(cursor);
    }

    /// Add to total fetched
    pub fn add_fetched(&mut self, count: u64) {
        self.total_fetched += count;
    }
}
