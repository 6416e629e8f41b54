use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calibration::Platform;
use crate::classify::{Lifecycle, Priority};
use crate::scoring::Dimensions;
use crate::{round3, MappedMetrics};

/// The scored result for one observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub keyword: String,
    /// Platform identifier as supplied by the caller.
    pub platform: String,
    pub platform_type: Platform,
    pub trend_score: u8,
    #[serde(rename = "H")]
    pub hotness: f64,
    #[serde(rename = "V")]
    pub velocity: f64,
    #[serde(rename = "D")]
    pub density: f64,
    #[serde(rename = "F")]
    pub feasibility: f64,
    #[serde(rename = "M")]
    pub monetization: f64,
    #[serde(rename = "R")]
    pub risk: f64,
    pub lifecycle: Lifecycle,
    pub priority: Priority,
    pub agent_ready: bool,
    pub category: String,
    pub raw_metrics: MappedMetrics,
    pub computed_at: DateTime<Utc>,
}

impl ScoreRecord {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        keyword: String,
        platform: String,
        platform_type: Platform,
        trend_score: u8,
        dims: &Dimensions,
        lifecycle: Lifecycle,
        priority: Priority,
        category: String,
        raw_metrics: MappedMetrics,
    ) -> Self {
        Self {
            keyword,
            platform,
            platform_type,
            trend_score,
            hotness: round3(dims.hotness),
            velocity: round3(dims.velocity),
            density: round3(dims.density),
            feasibility: round3(dims.feasibility),
            monetization: round3(dims.monetization),
            risk: round3(dims.risk),
            lifecycle,
            priority,
            agent_ready: priority.agent_ready(),
            category,
            raw_metrics,
            computed_at: Utc::now(),
        }
    }

    /// Dimension values as stored on the record (3 decimals).
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            hotness: self.hotness,
            velocity: self.velocity,
            density: self.density,
            feasibility: self.feasibility,
            monetization: self.monetization,
            risk: self.risk,
        }
    }
}
