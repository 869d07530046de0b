//! CLI module
//!
//! Command-line interface for fetching Trello resources.
//!
//! # Commands
//!
//! - `get` - Fetch a resource, optionally following pages
//! - `check` - Verify the configured credentials

mod commands;
mod runner;

pub use commands::{parse_param, Cli, Commands, OutputFormat};
pub use runner::Runner;
