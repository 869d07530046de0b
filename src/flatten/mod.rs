//! Flattening and merge module
//!
//! Turns decoded JSON pages into flat, tabular records and concatenates
//! pages into one result.
//!
//! # Overview
//!
//! - [`Flattener`] converts a JSON body into a [`Page`]: an array of objects
//!   becomes a [`Table`], nested objects become dotted column names and
//!   arrays become indexed column names. Any other shape is kept as
//!   [`Page::Raw`].
//! - [`Table::append`] concatenates tables in order and refuses pages whose
//!   columns hold a different kind of value than the rows already collected.

mod flattener;
mod table;

pub use flattener::{flatten_page, flatten_record, Flattener};
pub use table::{ColumnKind, Page, Record, SchemaConflict, Table};
