// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # charsync
//!
//! Fetches every page of a paginated character API, keeps the records that
//! match a fixed set of attribute criteria, and hands the projected
//! `name, location, image` rows to a CSV file, stdout or an HTTP caller.
//!
//! ## Features
//!
//! - **Cursor pagination**: follows `info.next` until it is null, with page,
//!   record and wall-clock caps plus cycle detection
//! - **Resilient HTTP**: retries with backoff, client-side rate limiting,
//!   per-request timeouts
//! - **Filtering**: exact species/status match and origin prefix match, with
//!   a configurable policy for records missing a field
//! - **Sinks**: atomic CSV files, JSON arrays, and an HTTP `/fetch` endpoint
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use charsync::{AppConfig, Result};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::default();
//!     let pipeline = config.pipeline()?;
//!
//!     let output = pipeline
//!         .run(&config.source.url, &CancellationToken::new())
//!         .await?;
//!     charsync::output::write_csv(&config.output.path, &output.records)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │  Transport   │ →  │ PageFetcher  │ →  │ RecordFilter │ →  │    Sinks     │
//! ├──────────────┤    ├──────────────┤    ├──────────────┤    ├──────────────┤
//! │ Retry        │    │ info.next    │    │ species ==   │    │ CSV (atomic) │
//! │ Rate limit   │    │ Page cap     │    │ status ==    │    │ JSON stdout  │
//! │ Timeout      │    │ Cycle check  │    │ origin ^=    │    │ HTTP /fetch  │
//! └──────────────┘    └──────────────┘    └──────────────┘    └──────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Raw and projected character records
pub mod record;

/// HTTP client with retry and rate limiting
pub mod http;

/// Cursor pagination over `info.next`
pub mod pagination;

/// Record filter and projection
pub mod filter;

/// Fetch-and-filter pipeline
pub mod pipeline;

/// CSV and JSON sinks
pub mod output;

/// Application configuration
pub mod config;

/// Command-line interface and HTTP server
pub mod cli;

#[cfg(test)]
mod testing;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::AppConfig;
pub use filter::{FilterCriteria, RecordFilter};
pub use pipeline::{Pipeline, PipelineOutput, PipelineStats};
pub use record::{ProjectedRecord, RawRecord};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
