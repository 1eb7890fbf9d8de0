//! Error types for charsync
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for charsync
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    // ============================================================================
    // Fetch Errors
    // ============================================================================
    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Page limit of {max_pages} exceeded")]
    PageLimitExceeded { max_pages: u32 },

    #[error("Record limit of {max_records} exceeded")]
    RecordLimitExceeded { max_records: usize },

    #[error("Pagination cycle detected: {url} was already fetched")]
    PaginationCycle { url: String },

    #[error("Fetch deadline of {limit_ms}ms exceeded")]
    DeadlineExceeded { limit_ms: u64 },

    #[error("Fetch cancelled")]
    Cancelled,

    // ============================================================================
    // Projection Errors
    // ============================================================================
    #[error("Record '{record}' is missing required field '{field}'")]
    Projection { record: String, field: String },

    // ============================================================================
    // Sink Errors
    // ============================================================================
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Output error: {message}")]
    Output { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Wrap an error with the URL of the page being fetched
    pub fn fetch(url: impl Into<String>, source: Error) -> Self {
        Self::Fetch {
            url: url.into(),
            source: Box::new(source),
        }
    }

    /// Create a projection error for a record missing a field
    pub fn projection(record: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Projection {
            record: record.into(),
            field: field.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::RateLimited { .. } | Error::Timeout { .. } => true,
            Error::Http(e) => e.is_connect() || e.is_timeout(),
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }

    /// Check if this error came from retrieving pages
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            Error::Fetch { .. }
                | Error::PageLimitExceeded { .. }
                | Error::RecordLimitExceeded { .. }
                | Error::PaginationCycle { .. }
                | Error::DeadlineExceeded { .. }
                | Error::Cancelled
        )
    }

    /// Check if this error is a timeout, looking through fetch wrappers
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Timeout { .. } | Error::DeadlineExceeded { .. } => true,
            Error::Http(e) => e.is_timeout(),
            Error::Fetch { source, .. } => source.is_timeout(),
            _ => false,
        }
    }

    /// Stable snake_case name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config { .. } | Error::InvalidConfigValue { .. } => "config",
            Error::YamlParse(_) | Error::JsonParse(_) => "parse",
            Error::InvalidUrl(_) => "invalid_url",
            Error::Http(_) => "http",
            Error::HttpStatus { .. } => "http_status",
            Error::RateLimited { .. } => "rate_limited",
            Error::Timeout { .. } => "timeout",
            Error::Decode { .. } => "decode",
            Error::Fetch { .. } => "fetch",
            Error::PageLimitExceeded { .. } => "page_limit_exceeded",
            Error::RecordLimitExceeded { .. } => "record_limit_exceeded",
            Error::PaginationCycle { .. } => "pagination_cycle",
            Error::DeadlineExceeded { .. } => "deadline_exceeded",
            Error::Cancelled => "cancelled",
            Error::Projection { .. } => "projection",
            Error::Csv(_) | Error::Output { .. } | Error::Io(_) => "sink",
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502..=504 | 520..=524)
}

/// Result type alias for charsync
pub type Result<T> = std::result::Result<T, Error>;
