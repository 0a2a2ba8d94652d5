//! Engine types
//!
//! Configuration and statistics for the sync engine.

use crate::config::WORKERS_STREAM;
use crate::pagination::{TerminationPolicy, PAGE_SIZE};

/// Configuration for a sync operation
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Stream name stamped on every record
    pub stream_name: String,
    /// Collection path relative to the base URL
    pub resource: String,
    /// Records per page
    pub page_size: u32,
    /// When to stop paging
    pub termination: TerminationPolicy,
    /// Maximum records to sync (0 = unlimited)
    pub max_records: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            stream_name: WORKERS_STREAM.to_string(),
            resource: WORKERS_STREAM.to_string(),
            page_size: PAGE_SIZE,
            termination: TerminationPolicy::default(),
            max_records: 0,
        }
    }
}

impl SyncConfig {
    /// Create a new sync config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the termination policy
    #[must_use]
    pub fn with_termination(mut self, termination: TerminationPolicy) -> Self {
        self.termination = termination;
        self
    }

    /// Set max records
    #[must_use]
    pub fn with_max_records(mut self, max: usize) -> Self {
        self.max_records = max;
        self
    }

    /// Set the page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Path of the count request
    pub fn count_path(&self) -> String {
        format!("{}?count=true", self.resource)
    }

    /// Whether `records` has hit the configured limit
    pub fn limit_reached(&self, records: usize) -> bool {
        self.max_records > 0 && records >= self.max_records
    }
}

/// Statistics from a sync operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Total reported by the count request
    pub total_reported: u64,
    /// Total records synced
    pub records_synced: usize,
    /// Total pages fetched
    pub pages_fetched: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SyncStats {
    /// Add records
    pub fn add_records(&mut self, count: usize) {
        self.records_synced += count;
    }

    /// Add a page
    pub fn add_page(&mut self) {
        self.pages_fetched += 1;
    }

    /// One-line summary for the final log message
    pub fn summary(&self, stream: &str) -> String {
        format!(
            "Completed sync of {stream}: {} records in {} pages ({} reported) in {}ms",
            self.records_synced, self.pages_fetched, self.total_reported, self.duration_ms
        )
    }
}
