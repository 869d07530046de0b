//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Fetch Trello REST resources as flat rows
#[derive(Parser, Debug)]
#[command(name = "trello-fetch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Application key (overrides config and TRELLO_KEY)
    #[arg(long, global = true)]
    pub key: Option<String>,

    /// User token (overrides config and TRELLO_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a resource
    Get {
        /// Absolute URL or path relative to the base URL, e.g. `boards/{id}/actions`
        url: String,

        /// Query parameter as key=value (repeatable)
        #[arg(short, long = "query", value_parser = parse_param)]
        query: Vec<(String, String)>,

        /// Follow pages with the `before` cursor
        #[arg(long)]
        paging: bool,

        /// Stop paging after this many pages
        #[arg(long, requires = "paging")]
        max_pages: Option<usize>,

        /// Output file (required for parquet)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Verify credentials by fetching the current member
    Check,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one row per line)
    Json,
    /// Human-readable output
    Pretty,
    /// Parquet file
    Parquet,
}

/// Parse a `key=value` query parameter
pub fn parse_param(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{s}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("filter=open", "filter", "open" ; "simple")]
    #[test_case("fields=name,desc", "fields", "name,desc" ; "comma value")]
    #[test_case("since=", "since", "" ; "empty value")]
    #[test_case("q=a=b", "q", "a=b" ; "equals in value")]
    fn test_parse_param(input: &str, key: &str, value: &str) {
        assert_eq!(
            parse_param(input).unwrap(),
            (key.to_string(), value.to_string())
        );
    }

    #[test_case("filter" ; "no equals")]
    #[test_case("=open" ; "empty key")]
    fn test_parse_param_invalid(input: &str) {
        assert!(parse_param(input).is_err());
    }

    #[test]
    fn test_cli_parses_get() {
        let cli = Cli::parse_from([
            "trello-fetch",
            "--token",
            "t",
            "get",
            "boards/b1/actions",
            "-q",
            "filter=createCard",
            "--paging",
            "--max-pages",
            "3",
        ]);

        assert_eq!(cli.token.as_deref(), Some("t"));
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Get {
                url,
                query,
                paging,
                max_pages,
                output,
            } => {
                assert_eq!(url, "boards/b1/actions");
                assert_eq!(query, vec![("filter".to_string(), "createCard".to_string())]);
                assert!(paging);
                assert_eq!(max_pages, Some(3));
                assert!(output.is_none());
            }
            Commands::Check => panic!("expected get"),
        }
    }

    #[test]
    fn test_cli_max_pages_requires_paging() {
        let result = Cli::try_parse_from(["trello-fetch", "get", "boards/b1", "--max-pages", "2"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parses_check_with_global_flags() {
        let cli = Cli::parse_from(["trello-fetch", "check", "-C", "trello.yaml", "-f", "pretty", "-v"]);
        assert!(matches!(cli.command, Commands::Check));
        assert_eq!(cli.config, Some(PathBuf::from("trello.yaml")));
        assert_eq!(cli.format, OutputFormat::Pretty);
        assert!(cli.verbose);
    }
}
