use crate::calibration::PlatformProfile;
use crate::config::VelocityWeights;
use crate::{clamp01, MappedMetrics};

/// Velocity reported when no previous-period snapshot exists.
pub const NEUTRAL_VELOCITY: f64 = 0.5;

/// Relative change, or zero when there is no positive baseline.
pub fn growth_rate(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) / previous
    } else {
        0.0
    }
}

#[derive(Debug, Clone)]
pub struct VelocityScorer {
    weights: VelocityWeights,
}

impl VelocityScorer {
    pub fn new(weights: VelocityWeights) -> Self {
        Self { weights }
    }

    /// Maps weighted growth onto [0,1]: -100% → 0, flat → 0.25, +300% → 1.
    pub fn score(
        &self,
        current: &MappedMetrics,
        previous: Option<&MappedMetrics>,
        profile: &PlatformProfile,
    ) -> f64 {
        let Some(previous) = previous else {
            return NEUTRAL_VELOCITY;
        };

        let platform = &profile.metric_weights;
        let terms = [
            (self.weights.views * platform.views, current.views, previous.views),
            (self.weights.likes * platform.likes, current.likes, previous.likes),
            (
                self.weights.comments * platform.comments,
                current.comments,
                previous.comments,
            ),
            (self.weights.shares * platform.shares, current.shares, previous.shares),
            (self.weights.saves * platform.saves, current.saves, previous.saves),
        ];

        let weighted_growth: f64 = terms
            .iter()
            .map(|(weight, current, previous)| weight * growth_rate(*current, *previous))
            .sum();

        clamp01((weighted_growth + 1.0) / 4.0)
    }
}

impl Default for VelocityScorer {
    fn default() -> Self {
        Self::new(VelocityWeights::default())
    }
}
