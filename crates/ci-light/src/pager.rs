//! Paged listing endpoints
//!
//! Fetches `base_url&per_page=N&page=1`, `page=2`, ... until a page comes
//! back empty. Every failure ends the walk early and keeps what was already
//! collected.

use ci_light_client::{FetchError, GitHubApi};
use log::{debug, warn};
use serde_json::Value;

/// Why a paged walk ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// A page was empty: the listing was read to the end
    EmptyPage,
    /// `max_pages` pages were fetched without reaching an empty page
    PageLimit,
    /// A page could not be fetched or decoded
    Failed(FetchError),
}

/// Items collected from a paged listing
#[derive(Debug, Clone, PartialEq)]
pub struct Paged<T> {
    pub items: Vec<T>,
    /// Pages that returned at least one item
    pub pages_fetched: u32,
    pub stop: StopReason,
}

impl<T> Paged<T> {
    /// True when the listing was read to its end
    pub fn is_complete(&self) -> bool {
        self.stop == StopReason::EmptyPage
    }
}

/// Walks paged listing endpoints
#[derive(Debug, Clone)]
pub struct ResourcePager {
    api: GitHubApi,
    page_size: u32,
    max_pages: u32,
}

impl ResourcePager {
    pub fn new(api: GitHubApi, page_size: u32, max_pages: u32) -> Self {
        Self {
            api,
            page_size,
            max_pages,
        }
    }

    pub fn api(&self) -> &GitHubApi {
        &self.api
    }

    /// URL of page `page` of the listing at `base_url`
    ///
    /// `base_url` is expected to carry a query string already.
    pub fn page_url(&self, base_url: &str, page: u32) -> String {
        format!("{}&per_page={}&page={}", base_url, self.page_size, page)
    }

    /// Fetch every page of `base_url`, mapping items through `extract`
    ///
    /// Items for which `extract` returns `None` are skipped. Stopping is
    /// driven by emptiness only: a page shorter than the page size still
    /// leads to one more request.
    pub async fn fetch_all<T, F>(&self, base_url: &str, extract: F) -> Paged<T>
    where
        F: Fn(&Value) -> Option<T>,
    {
        let mut items = Vec::new();
        let mut page = 1;

        let stop = loop {
            if page > self.max_pages {
                warn!(
                    "Stopped paging {} after {} pages without reaching the end",
                    base_url, self.max_pages
                );
                break StopReason::PageLimit;
            }

            let url = self.page_url(base_url, page);
            let fetched = self.api.fetch_json(&url).await;
            let entries = match fetched {
                Ok(Value::Array(entries)) => entries,
                Ok(other) => {
                    let err = FetchError::malformed(
                        url,
                        format!("expected a list, got {}", json_kind(&other)),
                    );
                    warn!("{}", err);
                    break StopReason::Failed(err);
                }
                Err(err) => {
                    warn!("Stopped paging {} at page {}: {}", base_url, page, err);
                    break StopReason::Failed(err);
                }
            };

            if entries.is_empty() {
                debug!("Page {} of {} is empty", page, base_url);
                break StopReason::EmptyPage;
            }

            items.extend(entries.iter().filter_map(&extract));
            page += 1;
        };

        Paged {
            items,
            pages_fetched: page - 1,
            stop,
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Extract `full_name` from a repository listing item
pub fn full_name(item: &Value) -> Option<String> {
    item.get("full_name")?.as_str().map(str::to_string)
}
