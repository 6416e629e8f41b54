use crate::clamp01;

pub const DEFAULT_FEASIBILITY: u8 = 3;

/// Normalizes a 1-5 feasibility score to [0,1]. Out-of-range input is clamped.
pub fn feasibility(score: Option<u8>) -> f64 {
    let score = score.unwrap_or(DEFAULT_FEASIBILITY).clamp(1, 5);
    clamp01(f64::from(score) / 5.0)
}
