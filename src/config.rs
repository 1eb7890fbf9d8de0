//! Application configuration
//!
//! All settings live in one YAML document. Every section and field is
//! optional; missing values fall back to the defaults below.
//!
//! ```yaml
//! source:
//!   url: https://rickandmortyapi.com/api/character
//! http:
//!   timeout_secs: 30
//!   max_retries: 3
//! limits:
//!   max_pages: 500
//! filter:
//!   on_missing_field: skip
//! output:
//!   path: characters.csv
//! server:
//!   port: 8000
//! ```

use crate::error::{Error, Result};
use crate::filter::{FilterCriteria, RecordFilter};
use crate::http::{HttpClient, HttpClientConfig, RateLimiterConfig, Transport};
use crate::output::DEFAULT_CSV_PATH;
use crate::pagination::FetchLimits;
use crate::pipeline::Pipeline;
use crate::types::{BackoffType, MissingFieldPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Default first page of the upstream API
pub const DEFAULT_SOURCE_URL: &str = "https://rickandmortyapi.com/api/character";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Upstream source
    pub source: SourceConfig,
    /// HTTP client settings
    pub http: HttpConfig,
    /// Fetch safety caps
    pub limits: LimitsConfig,
    /// Filter criteria and missing-field policy
    pub filter: FilterConfig,
    /// CSV output settings
    pub output: OutputConfig,
    /// HTTP server settings
    pub server: ServerSettings,
}

impl AppConfig {
    /// Read a YAML config file
    ///
    /// Values are not validated here; apply any overrides first, then call
    /// [`AppConfig::validate`] once.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&text)
    }

    /// Parse YAML config text without validating it
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a mapping
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Render as YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check values that would make a run impossible or unbounded
    pub fn validate(&self) -> Result<()> {
        let url = self.source.url.trim();
        if url.is_empty() {
            return Err(Error::invalid_value("source.url", "must not be empty"));
        }
        Url::parse(url).map_err(|e| Error::invalid_value("source.url", e.to_string()))?;

        if self.limits.max_pages == 0 {
            return Err(Error::invalid_value(
                "limits.max_pages",
                "must be greater than zero",
            ));
        }
        if self.http.max_backoff_ms < self.http.initial_backoff_ms {
            return Err(Error::invalid_value(
                "http.max_backoff_ms",
                "must not be less than http.initial_backoff_ms",
            ));
        }
        if self.http.timeout_secs == 0 {
            return Err(Error::invalid_value(
                "http.timeout_secs",
                "must be greater than zero",
            ));
        }
        Ok(())
    }

    /// HTTP client configuration derived from the `http` section
    pub fn http_client_config(&self) -> HttpClientConfig {
        let http = &self.http;
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(http.timeout_secs))
            .max_retries(http.max_retries)
            .backoff(
                http.backoff,
                Duration::from_millis(http.initial_backoff_ms),
                Duration::from_millis(http.max_backoff_ms),
            );

        builder = match http.requests_per_second {
            0 => builder.no_rate_limit(),
            rps => builder.rate_limit(RateLimiterConfig::per_second(rps)),
        };
        if let Some(agent) = &http.user_agent {
            builder = builder.user_agent(agent);
        }
        builder.build()
    }

    /// Fetch limits derived from the `limits` section
    pub fn fetch_limits(&self) -> FetchLimits {
        let mut limits = FetchLimits::new().with_max_pages(self.limits.max_pages);
        if let Some(max_records) = self.limits.max_records {
            limits = limits.with_max_records(max_records);
        }
        if let Some(secs) = self.limits.max_duration_secs {
            limits = limits.with_max_duration(Duration::from_secs(secs));
        }
        limits
    }

    /// Build a pipeline over the given transport
    pub fn pipeline_with<T: Transport>(&self, transport: T) -> Pipeline<T> {
        Pipeline::new(transport)
            .with_limits(self.fetch_limits())
            .with_filter(RecordFilter::new(self.filter.criteria.clone()))
            .with_policy(self.filter.on_missing_field)
    }

    /// Build a pipeline over a real HTTP client
    pub fn pipeline(&self) -> Result<Pipeline<HttpClient>> {
        let client = HttpClient::with_config(self.http_client_config())?;
        Ok(self.pipeline_with(client))
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Upstream source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// URL of the first page
    pub url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SOURCE_URL.to_string(),
        }
    }
}

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Retries on transient failures
    pub max_retries: u32,
    /// Backoff strategy between retries
    pub backoff: BackoffType,
    /// First backoff delay in milliseconds
    pub initial_backoff_ms: u64,
    /// Backoff ceiling in milliseconds
    pub max_backoff_ms: u64,
    /// Client-side rate limit; 0 disables it
    pub requests_per_second: u32,
    /// User agent override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 3,
            backoff: BackoffType::Exponential,
            initial_backoff_ms: 100,
            max_backoff_ms: 60_000,
            requests_per_second: 10,
            user_agent: None,
        }
    }
}

/// Fetch safety caps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum pages per run
    pub max_pages: u32,
    /// Maximum raw records per run
    pub max_records: Option<usize>,
    /// Wall-clock budget per run in seconds
    pub max_duration_secs: Option<u64>,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_pages: FetchLimits::default().max_pages,
            max_records: None,
            max_duration_secs: None,
        }
    }
}

/// Filter criteria and missing-field policy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Attribute values to match
    #[serde(flatten)]
    pub criteria: FilterCriteria,
    /// What to do with records missing a required field
    pub on_missing_field: MissingFieldPolicy,
}

/// CSV output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// CSV file path
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CSV_PATH),
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}
