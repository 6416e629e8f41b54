use crate::calibration::PlatformProfile;
use crate::{clamp01, MappedMetrics};

/// (minimum mapped views, additive bonus), checked top-down.
pub const VOLUME_BONUS_TIERS: [(f64, f64); 2] = [(50_000_000.0, 0.10), (10_000_000.0, 0.05)];

pub fn volume_bonus(views: f64) -> f64 {
    VOLUME_BONUS_TIERS
        .iter()
        .find(|(threshold, _)| views >= *threshold)
        .map(|(_, bonus)| *bonus)
        .unwrap_or(0.0)
}

pub fn monetization(base: f64, metrics: &MappedMetrics, profile: &PlatformProfile) -> f64 {
    let base = clamp01(base);
    clamp01(base * profile.monetization_multiplier + volume_bonus(metrics.views))
}
