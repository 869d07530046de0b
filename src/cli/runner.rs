//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::flatten::Page;
use crate::http::HttpClient;
use crate::output::{render_json_lines, render_pretty, write_table_to_parquet};
use crate::pagination::Pager;
use crate::query::Query;
use serde_json::json;
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Get {
                url,
                query,
                paging,
                max_pages,
                output,
            } => {
                let query: Query = query.iter().cloned().collect();
                self.get(url, &query, *paging, *max_pages, output.as_deref())
                    .await
            }
            Commands::Check => self.check().await,
        }
    }

    /// Resolve configuration: file, then environment, then flags
    pub fn load_config(&self) -> Result<Config> {
        let config = match &self.cli.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        let mut config = config.with_env();

        if let Some(key) = &self.cli.key {
            config.key = Some(key.clone());
        }
        if let Some(token) = &self.cli.token {
            config.token = Some(token.clone());
        }

        config.validate()?;
        Ok(config)
    }

    fn build_client(config: &Config) -> Result<HttpClient> {
        HttpClient::with_auth(config.http_config(), config.require_auth()?)
    }

    /// Fetch a resource and write it out
    async fn get(
        &self,
        url: &str,
        query: &Query,
        paging: bool,
        max_pages: Option<usize>,
        output: Option<&Path>,
    ) -> Result<()> {
        if self.cli.format == OutputFormat::Parquet && output.is_none() {
            return Err(Error::config("Parquet output requires --output"));
        }

        let config = self.load_config()?;
        let client = Self::build_client(&config)?;

        let mut pager_config = config.pager_config();
        if let Some(max) = max_pages {
            pager_config = pager_config.with_max_pages(max);
        }
        let pager = Pager::new(&client).with_config(pager_config);

        let start = Instant::now();
        let result = config
            .retry
            .run(|| pager.fetch_all(url, query, paging))
            .await;

        match result {
            Ok(page) => {
                info!(
                    url = %url,
                    rows = ?page.row_count(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Fetch complete"
                );
                self.write_page(&page, output)
            }
            Err(Error::Merge(merge)) => {
                warn!(
                    "{merge}; writing the {} rows fetched before the failure",
                    merge.partial.len()
                );
                self.write_page(&Page::Table(merge.partial.clone()), output)?;
                Err(Error::Merge(merge))
            }
            Err(e) => Err(e),
        }
    }

    /// Verify credentials against `members/me`
    async fn check(&self) -> Result<()> {
        let config = self.load_config()?;
        let client = Self::build_client(&config)?;

        let status = match client.fetch_page("members/me", &Query::new()).await {
            Ok(page) => {
                let member = page.to_json();
                json!({
                    "status": "SUCCEEDED",
                    "member": member.get("username").cloned().unwrap_or_default(),
                })
            }
            Err(e) => json!({
                "status": "FAILED",
                "message": format!("Connection failed: {e}"),
            }),
        };

        self.write_text(&self.render_value(&status)?, None)
    }

    /// Write a page in the selected format
    pub fn write_page(&self, page: &Page, output: Option<&Path>) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => self.write_text(&render_json_lines(page)?, output),
            OutputFormat::Pretty => self.write_text(&format!("{}\n", render_pretty(page)?), output),
            OutputFormat::Parquet => {
                let path = output.ok_or_else(|| Error::config("Parquet output requires --output"))?;
                let table = page.as_table().ok_or_else(|| {
                    Error::output("Response is not tabular and cannot be written as Parquet")
                })?;
                let rows = write_table_to_parquet(path, table, None)?;
                info!(path = %path.display(), rows, "Wrote Parquet file");
                Ok(())
            }
        }
    }

    fn render_value(&self, value: &serde_json::Value) -> Result<String> {
        let text = match self.cli.format {
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
            OutputFormat::Json | OutputFormat::Parquet => serde_json::to_string(value)?,
        };
        Ok(format!("{text}\n"))
    }

    fn write_text(&self, text: &str, output: Option<&Path>) -> Result<()> {
        match output {
            Some(path) => fs::write(path, text).map_err(|e| {
                Error::output(format!("Failed to write {}: {e}", path.display()))
            }),
            None => {
                print!("{text}");
                Ok(())
            }
        }
    }
}
