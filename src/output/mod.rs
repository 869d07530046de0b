//! Output module
//!
//! Renders fetch results for humans and files.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Converting a flattened [`Table`](crate::flatten::Table) to an Arrow RecordBatch
//! - Writing tables to Parquet files
//! - Rendering pages as JSON lines or pretty JSON

mod render;
mod schema;
mod writer;

pub use render::{render_json_lines, render_pretty};
pub use schema::{table_schema, table_to_arrow};
pub use writer::{write_table_to_parquet, ParquetWriterConfig};
