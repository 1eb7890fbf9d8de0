//! Transport abstraction
//!
//! The page fetcher only needs "GET this URL and give me the JSON body".
//! Keeping that behind a trait lets tests substitute an in-memory transport.

use crate::error::Result;
use crate::types::JsonValue;
use async_trait::async_trait;
use std::sync::Arc;

/// Something that can GET a URL and return its JSON body
///
/// Implementations report non-success statuses, network failures and
/// unparseable bodies as errors. The caller attaches the URL.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `url` and parse the response body as JSON
    async fn get_json(&self, url: &str) -> Result<JsonValue>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn get_json(&self, url: &str) -> Result<JsonValue> {
        (**self).get_json(url).await
    }
}

