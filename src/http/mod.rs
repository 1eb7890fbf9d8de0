//! HTTP client module
//!
//! Provides the HTTP client used to talk to the upstream API.
//!
//! # Features
//!
//! - **Automatic Retries**: Bounded retries on 429, 5xx, timeouts and connect errors
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Backoff Strategies**: Constant, linear, and exponential backoff
//! - **Transport Trait**: Injectable seam so the fetcher can run against test doubles

mod client;
mod rate_limit;
mod transport;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use transport::Transport;
