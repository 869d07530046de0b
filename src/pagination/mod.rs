//! Pagination module
//!
//! Fetches every page of a list endpoint by walking backward in time with
//! the `before` cursor.
//!
//! # Overview
//!
//! The [`Pager`] calls the request executor once per page, merges each page
//! into one table and continues only while pages come back full. The next
//! cursor is the id of the oldest row on the page just fetched.

mod cursor;
mod pager;
mod types;

pub use cursor::{id_timestamp, oldest_row_id, row_timestamp};
pub use pager::Pager;
pub use types::{NextPage, PagerConfig, PaginationState, StopReason};
