use crate::calibration::PlatformProfile;
use crate::{clamp01, log_normalize, MappedMetrics};

/// Shared reach ceiling so views normalize identically on every platform.
pub const VIEWS_REFERENCE: f64 = 100_000_000.0;
pub const POSTS_REFERENCE: f64 = 10_000.0;
/// Engagement rates above this are treated as saturated.
pub const ENGAGEMENT_RATE_CAP: f64 = 0.5;

pub fn views_norm(views: f64) -> f64 {
    log_normalize(views, VIEWS_REFERENCE)
}

pub fn posts_norm(posts: u64) -> f64 {
    log_normalize(posts as f64, POSTS_REFERENCE)
}

/// Interactions per view, saturating at [`ENGAGEMENT_RATE_CAP`]. Comments
/// count twice and shares three times. Platform metric weights do not apply
/// here; they only shape velocity.
pub fn engagement(metrics: &MappedMetrics) -> f64 {
    let interactions = metrics.likes + 2.0 * metrics.comments + 3.0 * metrics.shares;
    let rate = interactions / metrics.views.max(1.0);
    clamp01(rate.min(ENGAGEMENT_RATE_CAP) / ENGAGEMENT_RATE_CAP)
}

pub fn hotness(metrics: &MappedMetrics, profile: &PlatformProfile) -> f64 {
    let mix = &profile.hotness_mix;
    let blended = mix.views * views_norm(metrics.views)
        + mix.engagement * engagement(metrics)
        + mix.posts * posts_norm(metrics.posts);
    clamp01(profile.hotness_scale * blended)
}
