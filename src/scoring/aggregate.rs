use serde::{Deserialize, Serialize};

use crate::clamp01;
use crate::config::DimensionWeights;

/// The six normalized dimensions of one observation, unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub hotness: f64,
    pub velocity: f64,
    pub density: f64,
    pub feasibility: f64,
    pub monetization: f64,
    pub risk: f64,
}

#[derive(Debug, Clone)]
pub struct AggregateScorer {
    weights: DimensionWeights,
}

impl AggregateScorer {
    pub fn new(weights: DimensionWeights) -> Self {
        Self { weights }
    }

    /// Weighted sum with risk subtracted; may fall outside [0,1].
    pub fn raw(&self, dims: &Dimensions) -> f64 {
        let mut score = 0.0;

        score += dims.hotness * self.weights.hotness;
        score += dims.velocity * self.weights.velocity;
        score += dims.density * self.weights.density;
        score += dims.feasibility * self.weights.feasibility;
        score += dims.monetization * self.weights.monetization;
        score -= dims.risk * self.weights.risk;

        score
    }

    /// Integer 0-100. Clamping happens before scaling.
    pub fn score(&self, dims: &Dimensions) -> u8 {
        (clamp01(self.raw(dims)) * 100.0).round() as u8
    }
}

impl Default for AggregateScorer {
    fn default() -> Self {
        Self::new(DimensionWeights::default())
    }
}
