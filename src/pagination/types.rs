//! Pagination types
//!
//! Defines the page shape, fetch limits and the cursor state carried
//! between page requests.

use crate::error::{Error, Result};
use crate::record::RawRecord;
use crate::types::JsonValue;
use std::collections::HashSet;
use std::time::{Duration, Instant};
use url::Url;

/// One HTTP response unit: a batch of records and a pointer to the next batch
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// URL this page was fetched from
    pub url: String,
    /// 1-based position in the chain
    pub number: u32,
    /// Records in upstream order
    pub items: Vec<RawRecord>,
    /// Absolute URL of the next page, `None` on the last page
    pub next: Option<String>,
}

impl Page {
    /// Parse a response body of the form `{ "info": { "next": .. }, "results": [..] }`
    ///
    /// `next` may be a string, `null`, an empty string or absent. Relative
    /// links are resolved against `url`.
    pub fn from_json(url: impl Into<String>, number: u32, body: JsonValue) -> Result<Self> {
        let url = url.into();
        let JsonValue::Object(mut body) = body else {
            return Err(Error::decode("page body is not a JSON object"));
        };

        let results = match body.remove("results") {
            Some(JsonValue::Array(results)) => results,
            Some(_) => return Err(Error::decode("'results' is not an array")),
            None => return Err(Error::decode("missing 'results'")),
        };

        let items = results
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                RawRecord::from_value(item)
                    .ok_or_else(|| Error::decode(format!("results[{i}] is not an object")))
            })
            .collect::<Result<Vec<_>>>()?;

        let next = match body.get("info") {
            None | Some(JsonValue::Null) => None,
            Some(JsonValue::Object(info)) => match info.get("next") {
                None | Some(JsonValue::Null) => None,
                Some(JsonValue::String(next)) if next.trim().is_empty() => None,
                Some(JsonValue::String(next)) => Some(resolve_next(&url, next)?),
                Some(_) => return Err(Error::decode("'info.next' is not a string")),
            },
            Some(_) => return Err(Error::decode("'info' is not an object")),
        };

        Ok(Self {
            url,
            number,
            items,
            next,
        })
    }

    /// Check if this is the last page of the chain
    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }
}

fn resolve_next(current: &str, next: &str) -> Result<String> {
    let base = Url::parse(current)?;
    Ok(base.join(next)?.to_string())
}

/// Safety caps for a single fetch run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchLimits {
    /// Maximum number of pages to request
    pub max_pages: u32,
    /// Maximum number of raw records to accept
    pub max_records: Option<usize>,
    /// Wall-clock budget, checked between pages
    pub max_duration: Option<Duration>,
}

impl Default for FetchLimits {
    fn default() -> Self {
        Self {
            max_pages: 500,
            max_records: None,
            max_duration: None,
        }
    }
}

impl FetchLimits {
    /// Create limits with the default page cap and nothing else
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page cap
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Set the record cap
    #[must_use]
    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = Some(max_records);
        self
    }

    /// Set the wall-clock budget
    #[must_use]
    pub fn with_max_duration(mut self, max_duration: Duration) -> Self {
        self.max_duration = Some(max_duration);
        self
    }
}

/// Cursor state owned by the fetch loop
#[derive(Debug, Clone)]
pub struct PaginationState {
    /// URL of the next page to request
    pub next_url: Option<String>,
    /// Pages fetched so far
    pub pages_fetched: u32,
    /// Raw records received so far
    pub records_seen: usize,
    visited: HashSet<String>,
    started: Instant,
}

impl PaginationState {
    /// Start a chain at `start_url`
    pub fn new(start_url: impl Into<String>) -> Self {
        Self {
            next_url: Some(start_url.into()),
            pages_fetched: 0,
            records_seen: 0,
            visited: HashSet::new(),
            started: Instant::now(),
        }
    }

    /// Time since the chain started
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Verify the next request is within limits and mark its URL as visited
    pub fn begin_page(&mut self, url: &str, limits: &FetchLimits) -> Result<()> {
        if url.trim().is_empty() {
            return Err(Error::config("start URL must not be empty"));
        }
        if self.pages_fetched >= limits.max_pages {
            return Err(Error::PageLimitExceeded {
                max_pages: limits.max_pages,
            });
        }
        if let Some(max) = limits.max_duration {
            if self.elapsed() > max {
                return Err(Error::DeadlineExceeded {
                    limit_ms: max.as_millis() as u64,
                });
            }
        }
        self.visited.insert(url.to_string());
        Ok(())
    }

    /// Account for a received page and advance the cursor
    pub fn finish_page(&mut self, page: &Page, limits: &FetchLimits) -> Result<()> {
        self.pages_fetched += 1;
        self.records_seen += page.items.len();

        if let Some(max) = limits.max_records {
            if self.records_seen > max {
                return Err(Error::RecordLimitExceeded { max_records: max });
            }
        }

        if let Some(next) = &page.next {
            if self.visited.contains(next) {
                return Err(Error::PaginationCycle { url: next.clone() });
            }
        }

        self.next_url.clone_from(&page.next);
        Ok(())
    }
}
