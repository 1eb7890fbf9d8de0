//! Paginated fetcher
//!
//! Follows `info.next` links one request at a time and exposes the chain
//! as a lazy stream of pages.

use super::types::{FetchLimits, Page, PaginationState};
use crate::error::{Error, Result};
use crate::http::Transport;
use crate::record::RawRecord;
use futures::stream::{self, Stream, TryStreamExt};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Retrieves the complete ordered collection of records from a paginated source
#[derive(Debug, Clone)]
pub struct PageFetcher<T> {
    transport: T,
    limits: FetchLimits,
}

impl<T: Transport> PageFetcher<T> {
    /// Create a fetcher with default limits
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            limits: FetchLimits::default(),
        }
    }

    /// Set fetch limits
    #[must_use]
    pub fn with_limits(mut self, limits: FetchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Lazily fetch pages starting at `start_url`
    ///
    /// Each poll issues at most one request. The stream ends after the page
    /// whose `next` is empty, or at the first error. Cancellation is checked
    /// before every request and raced against the request in flight.
    pub fn pages(
        &self,
        start_url: &str,
        cancel: CancellationToken,
    ) -> impl Stream<Item = Result<Page>> + '_ {
        let state = PaginationState::new(start_url);

        stream::try_unfold(state, move |mut state| {
            let cancel = cancel.clone();
            async move {
                self.next_page(&mut state, &cancel)
                    .await
                    .map(|page| page.map(|page| (page, state)))
            }
        })
    }

    async fn next_page(
        &self,
        state: &mut PaginationState,
        cancel: &CancellationToken,
    ) -> Result<Option<Page>> {
        let Some(url) = state.next_url.take() else {
            return Ok(None);
        };
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        state.begin_page(&url, &self.limits)?;

        let body = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(Error::Cancelled),
            body = self.transport.get_json(&url) => {
                body.map_err(|e| Error::fetch(url.as_str(), e))?
            }
        };

        let number = state.pages_fetched + 1;
        let page = Page::from_json(url.as_str(), number, body).map_err(|e| Error::fetch(url, e))?;
        state.finish_page(&page, &self.limits)?;

        debug!(
            page = page.number,
            items = page.items.len(),
            last = page.is_last(),
            "Fetched {}",
            page.url
        );
        Ok(Some(page))
    }

    /// Lazily fetch records across all pages, in page then in-page order
    pub fn records(
        &self,
        start_url: &str,
        cancel: CancellationToken,
    ) -> impl Stream<Item = Result<RawRecord>> + '_ {
        self.pages(start_url, cancel)
            .map_ok(|page| stream::iter(page.items.into_iter().map(Ok::<_, Error>)))
            .try_flatten()
    }

    /// Fetch every record; any failure discards what was gathered
    pub async fn fetch_all(
        &self,
        start_url: &str,
        cancel: CancellationToken,
    ) -> Result<Vec<RawRecord>> {
        self.records(start_url, cancel).try_collect().await
    }
}
