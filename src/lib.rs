pub mod batch;
pub mod calibration;
pub mod classify;
pub mod config;
pub mod crawl;
pub mod error;
pub mod history;
pub mod scoring;

use serde::{Deserialize, Serialize};

pub use batch::{rank_records, BatchProcessor, BatchReport, RejectedObservation};
pub use calibration::{profile_for, Platform, PlatformProfile};
pub use classify::{Lifecycle, Priority};
pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use history::{HistoryEntry, HistoryKey, MemoryHistory, VelocityHistory};
pub use scoring::{Dimensions, ScoreRecord, TrendScorer};

/// Raw engagement counters as reported by a crawler for one observation.
///
/// Every field is optional because platforms expose incompatible field sets.
/// Twitter-style names are accepted as aliases of the generic counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<f64>,
    #[serde(default, alias = "replies", skip_serializing_if = "Option::is_none")]
    pub comments: Option<f64>,
    #[serde(default, alias = "retweets", skip_serializing_if = "Option::is_none")]
    pub shares: Option<f64>,
    #[serde(default, alias = "bookmarks", skip_serializing_if = "Option::is_none")]
    pub saves: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upvotes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downvotes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl RawMetrics {
    /// Clamps negative and non-finite counters to zero.
    pub fn sanitized(&self) -> Self {
        let fix = |value: Option<f64>| value.map(non_negative);
        Self {
            views: fix(self.views),
            likes: fix(self.likes),
            comments: fix(self.comments),
            shares: fix(self.shares),
            saves: fix(self.saves),
            upvotes: fix(self.upvotes),
            downvotes: fix(self.downvotes),
            score: fix(self.score),
        }
    }

    /// Adds every present counter of `other` into `self`.
    pub fn accumulate(&mut self, other: &RawMetrics) {
        let add = |total: &mut Option<f64>, value: Option<f64>| {
            if let Some(value) = value {
                *total = Some(total.unwrap_or(0.0) + non_negative(value));
            }
        };
        add(&mut self.views, other.views);
        add(&mut self.likes, other.likes);
        add(&mut self.comments, other.comments);
        add(&mut self.shares, other.shares);
        add(&mut self.saves, other.saves);
        add(&mut self.upvotes, other.upvotes);
        add(&mut self.downvotes, other.downvotes);
        add(&mut self.score, other.score);
    }

    pub fn is_empty(&self) -> bool {
        *self == RawMetrics::default()
    }
}

/// Counters after platform remapping, in the generic shape every calculator reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MappedMetrics {
    pub views: f64,
    pub likes: f64,
    pub comments: f64,
    pub shares: f64,
    pub saves: f64,
    pub score: f64,
    pub posts: u64,
}

/// Inputs supplied by upstream classifiers rather than crawled counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Externals {
    /// Execution feasibility on a 1-5 scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feasibility: Option<u8>,
    /// Base monetization potential in [0,1] before platform adjustment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monetization: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_risk: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competition_risk: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// One (keyword, platform) observation to score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub keyword: String,
    pub platform: String,
    #[serde(default)]
    pub stats: RawMetrics,
    #[serde(default)]
    pub posts: u64,
    /// Previous-period snapshot. When present the history store is not consulted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<RawMetrics>,
    #[serde(flatten)]
    pub externals: Externals,
    /// Record the current stats in the history store after scoring.
    #[serde(default = "default_true")]
    pub update_history: bool,
}

impl Observation {
    pub fn new(
        keyword: impl Into<String>,
        platform: impl Into<String>,
        stats: RawMetrics,
        posts: u64,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            platform: platform.into(),
            stats,
            posts,
            previous: None,
            externals: Externals::default(),
            update_history: true,
        }
    }

    pub fn with_previous(mut self, previous: RawMetrics) -> Self {
        self.previous = Some(previous);
        self
    }

    pub fn with_externals(mut self, externals: Externals) -> Self {
        self.externals = externals;
        self
    }

    /// Replays leave the history store untouched.
    pub fn without_history_update(mut self) -> Self {
        self.update_history = false;
        self
    }
}

fn default_true() -> bool {
    true
}

/// Trims, lower-cases and strips a leading `#` so hashtag variants share history.
pub fn normalize_keyword(keyword: &str) -> String {
    keyword.trim().trim_start_matches('#').trim().to_lowercase()
}

pub(crate) fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.max(0.0).min(1.0)
}

pub(crate) fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// `ln(1 + value) / ln(1 + reference)`, clamped to [0,1].
pub(crate) fn log_normalize(value: f64, reference: f64) -> f64 {
    if value <= 0.0 || reference <= 0.0 {
        return 0.0;
    }
    clamp01(value.ln_1p() / reference.ln_1p())
}

pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

pub fn format_float(value: f64, digits: usize) -> String {
    format!("{:.1$}", value, digits)
}

pub fn format_number(value: f64) -> String {
    let rounded = value.round().max(0.0) as i64;
    let mut chars: Vec<char> = rounded.to_string().chars().collect();
    let mut result = String::new();
    let mut count = 0usize;

    while let Some(ch) = chars.pop() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(ch);
        count += 1;
    }

    result.chars().rev().collect()
}
