//! Velocity history: the last-seen raw metrics per (platform, keyword).
//!
//! Velocity needs a previous-period snapshot. Callers that do not supply one
//! explicitly fall back to whatever a [`VelocityHistory`] recorded on the prior
//! call for the same key.

pub mod memory;
pub mod snapshot;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calibration::Platform;
use crate::error::Result;
use crate::{normalize_keyword, RawMetrics};

pub use memory::MemoryHistory;
pub use snapshot::HistorySnapshot;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HistoryKey {
    pub platform: Platform,
    pub keyword: String,
}

impl HistoryKey {
    pub fn new(platform: Platform, keyword: &str) -> Self {
        Self {
            platform,
            keyword: normalize_keyword(keyword),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub metrics: RawMetrics,
    pub posts: u64,
    pub recorded_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(metrics: RawMetrics, posts: u64) -> Self {
        Self {
            metrics,
            posts,
            recorded_at: Utc::now(),
        }
    }
}

/// Keyed store of previous-period snapshots.
///
/// Implementations must make [`swap`](VelocityHistory::swap) atomic per key:
/// two concurrent swaps on one key each observe the other's write or the
/// prior value, never lose one. Distinct keys must not block each other.
pub trait VelocityHistory: Send + Sync {
    /// Reads the last entry for `key` without modifying it.
    fn previous(&self, key: &HistoryKey) -> Result<Option<HistoryEntry>>;

    /// Stores `entry` under `key` and returns the entry it replaced.
    fn swap(&self, key: &HistoryKey, entry: HistoryEntry) -> Result<Option<HistoryEntry>>;
}
