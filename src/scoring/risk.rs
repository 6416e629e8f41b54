use crate::calibration::PlatformProfile;
use crate::{clamp01, MappedMetrics};

pub const IP_RISK_WEIGHT: f64 = 0.6;
pub const COMPETITION_RISK_WEIGHT: f64 = 0.4;

pub fn competition_risk(
    metrics: &MappedMetrics,
    profile: &PlatformProfile,
    external: Option<f64>,
) -> f64 {
    clamp01(profile.competition.resolve(metrics, external))
}

/// Penalty magnitude; subtracted by the aggregator.
pub fn risk(ip_risk: f64, competition_risk: f64) -> f64 {
    clamp01(IP_RISK_WEIGHT * clamp01(ip_risk) + COMPETITION_RISK_WEIGHT * clamp01(competition_risk))
}
