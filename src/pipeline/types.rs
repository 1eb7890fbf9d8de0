//! Pipeline output and statistics

use crate::record::ProjectedRecord;
use serde::Serialize;

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    /// Pages fetched
    pub pages_fetched: usize,
    /// Raw records received
    pub records_seen: usize,
    /// Records that matched and were projected
    pub records_kept: usize,
    /// Records dropped because a required field was missing
    pub records_skipped: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl PipelineStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page
    pub fn add_page(&mut self) {
        self.pages_fetched += 1;
    }

    /// Add a received record
    pub fn add_seen(&mut self) {
        self.records_seen += 1;
    }

    /// Add a kept record
    pub fn add_kept(&mut self) {
        self.records_kept += 1;
    }

    /// Add a skipped record
    pub fn add_skipped(&mut self) {
        self.records_skipped += 1;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}

/// Ordered result of a complete run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineOutput {
    /// Projected records in upstream order
    pub records: Vec<ProjectedRecord>,
    /// Run statistics
    pub stats: PipelineStats,
}
