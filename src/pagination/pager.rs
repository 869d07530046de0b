//! Paged fetching

use super::cursor::oldest_row_id;
use super::types::{NextPage, PagerConfig, PaginationState, StopReason};
use crate::error::{Error, Result};
use crate::flatten::{Page, Table};
use crate::http::HttpClient;
use crate::query::Query;
use crate::types::PAGE_SIZE_CEILING;
use tracing::{debug, info, warn};

/// Fetches one or all pages of a list endpoint
#[derive(Debug)]
pub struct Pager<'a> {
    client: &'a HttpClient,
    config: PagerConfig,
}

impl<'a> Pager<'a> {
    /// Create a pager using the API defaults
    pub fn new(client: &'a HttpClient) -> Self {
        Self {
            client,
            config: PagerConfig::default(),
        }
    }

    /// Set pager configuration
    #[must_use]
    pub fn with_config(mut self, config: PagerConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the pager configuration
    pub fn config(&self) -> &PagerConfig {
        &self.config
    }

    /// Fetch a resource, optionally following pages.
    ///
    /// Without paging this is a single request. With paging, requests are
    /// issued one after another until a page comes back with fewer rows
    /// than the page size, and the pages are concatenated in fetch order.
    ///
    /// A non-tabular first page is returned as is. A later page that cannot
    /// be merged ends the loop with [`Error::Merge`], which carries both the
    /// rows merged so far and the offending page.
    pub async fn fetch_all(&self, url: &str, base_query: &Query, use_paging: bool) -> Result<Page> {
        if !use_paging {
            let page = self.client.fetch_page(url, base_query).await?;
            if page.row_count() == Some(PAGE_SIZE_CEILING as usize) {
                info!(
                    url = %url,
                    "Response has {PAGE_SIZE_CEILING} rows; more may exist, enable paging to fetch them"
                );
            }
            return Ok(page);
        }

        let mut query = base_query.clone();
        query.set_limit(self.config.effective_page_size());

        let mut state = PaginationState::new();
        if let Some(before) = query.cursor() {
            state.set_cursor(before.to_string());
        }
        let mut accumulated = Table::new();

        loop {
            let page = self.client.fetch_page(url, &query).await?;
            state.add_page();
            let next = self.next_page(&page, &state);

            match page {
                Page::Raw(value) if state.pages == 1 => {
                    info!(url = %url, "Response is not tabular, returning it unmerged");
                    return Ok(Page::Raw(value));
                }
                Page::Raw(value) => {
                    warn!(url = %url, page = state.pages, "Page is not tabular, stopping");
                    return Err(Error::merge(
                        accumulated,
                        Page::Raw(value),
                        state.pages,
                        "page is not tabular",
                    ));
                }
                Page::Table(table) => {
                    let rows = table.len() as u64;
                    if let Err((conflict, rejected)) = accumulated.append(table) {
                        warn!(url = %url, page = state.pages, "Cannot merge page: {conflict}");
                        return Err(Error::merge(
                            accumulated,
                            Page::Table(rejected),
                            state.pages,
                            conflict.to_string(),
                        ));
                    }
                    state.add_fetched(rows);
                }
            }

            match next {
                NextPage::Continue { before } => {
                    debug!(
                        url = %url,
                        page = state.pages,
                        before = %before,
                        "Page is full, fetching older rows"
                    );
                    query.set_before(before.clone());
                    state.set_cursor(before);
                }
                NextPage::Done(reason) => {
                    info!(
                        url = %url,
                        pages = state.pages,
                        rows = state.total_fetched,
                        "Fetched {} rows in {} pages ({reason})",
                        state.total_fetched,
                        state.pages
                    );
                    return Ok(Page::Table(accumulated));
                }
            }
        }
    }

    /// Decide whether another page is needed after `page`
    pub fn next_page(&self, page: &Page, state: &PaginationState) -> NextPage {
        let Some(table) = page.as_table() else {
            return NextPage::Done(StopReason::NonTabular);
        };

        if table.is_empty() {
            return NextPage::Done(StopReason::EmptyPage);
        }

        if table.len() != self.config.effective_page_size() as usize {
            return NextPage::Done(StopReason::PartialPage);
        }

        if self.config.max_pages.is_some_and(|max| state.pages >= max) {
            return NextPage::Done(StopReason::MaxPages);
        }

        match oldest_row_id(table, &self.config.date_field, &self.config.id_field) {
            None => {
                warn!("Full page has no row with a usable id and timestamp, stopping");
                NextPage::Done(StopReason::NoCursor)
            }
            Some(before) if state.cursor.as_deref() == Some(before.as_str()) => {
                warn!(before = %before, "Cursor did not advance, stopping");
                NextPage::Done(StopReason::CursorStalled)
            }
            Some(before) => NextPage::Continue { before },
        }
    }
}
