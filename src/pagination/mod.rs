//! Pagination module
//!
//! Follows a "next URL in response body" chain until the server signals
//! completion.
//!
//! # Overview
//!
//! The upstream API answers every request with a batch of records under
//! `results` and a link to the following batch under `info.next`. The
//! [`PageFetcher`] walks that chain sequentially. It is bounded by
//! [`FetchLimits`] (page cap, record cap, wall-clock budget), rejects
//! cycles, and stops early when its cancellation token fires.

mod fetcher;
mod types;

pub use fetcher::PageFetcher;
pub use types::{FetchLimits, Page, PaginationState};
