use std::sync::Arc;
use tracing::{debug, warn};

use crate::calibration::{profile_for, KeywordCatalog, Platform, PlatformProfile};
use crate::classify::{classify_lifecycle, classify_priority, LifecycleSignals, PrioritySignals};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::history::{HistoryEntry, HistoryKey, MemoryHistory, VelocityHistory};
use crate::scoring::{
    density, feasibility, hotness, monetization, risk, AggregateScorer, Dimensions, ScoreRecord,
    VelocityScorer,
};
use crate::{clamp01, MappedMetrics, Observation};

/// Scores single observations end to end: calibration, dimensions, aggregate
/// score and classification.
#[derive(Clone)]
pub struct TrendScorer {
    velocity: VelocityScorer,
    aggregate: AggregateScorer,
    catalog: KeywordCatalog,
    history: Arc<dyn VelocityHistory>,
}

impl TrendScorer {
    pub fn new(
        velocity: VelocityScorer,
        aggregate: AggregateScorer,
        catalog: KeywordCatalog,
        history: Arc<dyn VelocityHistory>,
    ) -> Self {
        Self {
            velocity,
            aggregate,
            catalog,
            history,
        }
    }

    pub fn from_config(config: &EngineConfig, history: Arc<dyn VelocityHistory>) -> Self {
        Self::new(
            VelocityScorer::new(config.velocity.clone()),
            AggregateScorer::new(config.weights.clone()),
            config.keyword_catalog(),
            history,
        )
    }

    /// A scorer with default weights and a fresh in-memory history.
    pub fn with_memory_history(config: &EngineConfig) -> Self {
        let history = Arc::new(MemoryHistory::from_config(&config.history));
        Self::from_config(config, history)
    }

    pub fn catalog(&self) -> &KeywordCatalog {
        &self.catalog
    }

    pub fn score(&self, observation: &Observation) -> Result<ScoreRecord> {
        let platform: Platform = observation.platform.parse()?;
        let profile = profile_for(platform);

        let current_raw = observation.stats.sanitized();
        let current = profile.map_metrics(&current_raw, observation.posts);
        let previous = self.resolve_previous(platform, profile, observation);

        let keyword_profile = self.catalog.lookup(&observation.keyword);
        let externals = &observation.externals;

        let dims = Dimensions {
            hotness: hotness(&current, profile),
            velocity: self.velocity.score(&current, previous.as_ref(), profile),
            density: density(observation.posts),
            feasibility: feasibility(externals.feasibility),
            monetization: monetization(
                externals.monetization.unwrap_or(keyword_profile.monetization),
                &current,
                profile,
            ),
            risk: risk::risk(
                externals.ip_risk.unwrap_or(keyword_profile.ip_risk),
                risk::competition_risk(
                    &current,
                    profile,
                    externals
                        .competition_risk
                        .or(Some(keyword_profile.competition_risk)),
                ),
            ),
        };
        debug_assert!(dims_in_range(&dims));

        let trend_score = self.aggregate.score(&dims);
        let lifecycle = classify_lifecycle(&LifecycleSignals {
            hotness: dims.hotness,
            velocity: dims.velocity,
            density: dims.density,
        });
        let priority = classify_priority(&PrioritySignals {
            trend_score,
            monetization: dims.monetization,
            feasibility: dims.feasibility,
        });

        debug!(
            keyword = %observation.keyword,
            platform = %platform,
            trend_score,
            h = dims.hotness,
            v = dims.velocity,
            d = dims.density,
            f = dims.feasibility,
            m = dims.monetization,
            r = dims.risk,
            %lifecycle,
            %priority,
            "scored observation"
        );

        let category = externals
            .category
            .clone()
            .unwrap_or_else(|| keyword_profile.category.clone());

        Ok(ScoreRecord::new(
            observation.keyword.clone(),
            observation.platform.clone(),
            platform,
            trend_score,
            &dims,
            lifecycle,
            priority,
            category,
            current,
        ))
    }

    /// Explicit snapshots bypass the store. Otherwise the store is read, and
    /// swapped atomically when the caller wants history updated. Store
    /// failures degrade to "no previous snapshot".
    fn resolve_previous(
        &self,
        platform: Platform,
        profile: &PlatformProfile,
        observation: &Observation,
    ) -> Option<MappedMetrics> {
        if let Some(previous) = observation.previous.as_ref() {
            return Some(profile.map_metrics(previous, observation.posts));
        }

        let key = HistoryKey::new(platform, &observation.keyword);
        let lookup = if observation.update_history {
            let entry = HistoryEntry::new(observation.stats.sanitized(), observation.posts);
            self.history.swap(&key, entry)
        } else {
            self.history.previous(&key)
        };

        match lookup {
            Ok(entry) => entry.map(|entry| profile.map_metrics(&entry.metrics, entry.posts)),
            Err(err) => {
                warn!(
                    keyword = %observation.keyword,
                    platform = %platform,
                    error = %err,
                    "velocity history unavailable, using neutral velocity"
                );
                None
            }
        }
    }
}

fn dims_in_range(dims: &Dimensions) -> bool {
    [
        dims.hotness,
        dims.velocity,
        dims.density,
        dims.feasibility,
        dims.monetization,
        dims.risk,
    ]
    .iter()
    .all(|value| clamp01(*value) == *value)
}
