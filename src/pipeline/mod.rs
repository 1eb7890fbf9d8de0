//! Fetch-and-filter pipeline
//!
//! Drives the page fetcher, runs every record through the filter, and
//! collects the projected records in upstream order.
//!
//! # Overview
//!
//! A run is all-or-nothing: any fetch error discards everything gathered
//! so far. Records missing a field the filter needs are handled according
//! to the [`MissingFieldPolicy`].

mod types;

pub use types::{PipelineOutput, PipelineStats};

use crate::error::{Error, Result};
use crate::filter::RecordFilter;
use crate::http::Transport;
use crate::pagination::{FetchLimits, PageFetcher};
use crate::types::MissingFieldPolicy;
use futures::TryStreamExt;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Paginated fetch, filter and projection in one pass
#[derive(Debug, Clone)]
pub struct Pipeline<T> {
    fetcher: PageFetcher<T>,
    filter: RecordFilter,
    policy: MissingFieldPolicy,
}

impl<T: Transport> Pipeline<T> {
    /// Create a pipeline with default limits, criteria and policy
    pub fn new(transport: T) -> Self {
        Self {
            fetcher: PageFetcher::new(transport),
            filter: RecordFilter::default(),
            policy: MissingFieldPolicy::default(),
        }
    }

    /// Set fetch limits
    #[must_use]
    pub fn with_limits(mut self, limits: FetchLimits) -> Self {
        self.fetcher = self.fetcher.with_limits(limits);
        self
    }

    /// Set the record filter
    #[must_use]
    pub fn with_filter(mut self, filter: RecordFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Set the missing-field policy
    #[must_use]
    pub fn with_policy(mut self, policy: MissingFieldPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run the whole pipeline starting at `start_url`
    pub async fn run(&self, start_url: &str, cancel: &CancellationToken) -> Result<PipelineOutput> {
        let start = Instant::now();
        let mut stats = PipelineStats::new();
        let mut records = Vec::new();

        info!("Starting fetch from {start_url}");

        let mut pages = std::pin::pin!(self.fetcher.pages(start_url, cancel.clone()));
        while let Some(page) = pages.try_next().await? {
            stats.add_page();
            let kept_before = records.len();

            for raw in &page.items {
                stats.add_seen();
                match self.filter.apply(raw) {
                    Ok(Some(projected)) => {
                        stats.add_kept();
                        records.push(projected);
                    }
                    Ok(None) => {}
                    Err(err @ Error::Projection { .. }) => match self.policy {
                        MissingFieldPolicy::Skip => {
                            warn!(page = page.number, "Skipping record: {err}");
                            stats.add_skipped();
                        }
                        MissingFieldPolicy::Fail => return Err(err),
                    },
                    Err(err) => return Err(err),
                }
            }

            debug!(
                "Page {}: kept {} of {} records",
                page.number,
                records.len() - kept_before,
                page.items.len()
            );
        }

        stats.set_duration(start.elapsed().as_millis() as u64);
        info!(
            pages = stats.pages_fetched,
            seen = stats.records_seen,
            kept = stats.records_kept,
            skipped = stats.records_skipped,
            "Completed fetch in {}ms",
            stats.duration_ms
        );

        Ok(PipelineOutput { records, stats })
    }
}
