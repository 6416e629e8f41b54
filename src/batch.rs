use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{info, warn};

use crate::calibration::Platform;
use crate::config::BatchConfig;
use crate::error::{EngineError, Result};
use crate::scoring::{ScoreRecord, TrendScorer};
use crate::{normalize_keyword, Observation};

/// An observation the batch skipped, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedObservation {
    pub index: usize,
    pub keyword: String,
    pub platform: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    /// Records per platform, in input order.
    pub records: BTreeMap<Platform, Vec<ScoreRecord>>,
    pub rejected: Vec<RejectedObservation>,
}

impl BatchReport {
    pub fn record_count(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }
}

/// Scores collections of observations in parallel.
///
/// Observations that share a history key run one after another in input
/// order, so velocity history advances deterministically. Distinct keys are
/// spread over a bounded worker pool.
pub struct BatchProcessor {
    scorer: TrendScorer,
    pool: ThreadPool,
}

impl BatchProcessor {
    pub fn new(scorer: TrendScorer, config: &BatchConfig) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .thread_name(|index| format!("trend-batch-{}", index))
            .build()
            .map_err(|err| EngineError::Config(format!("failed to build batch pool: {}", err)))?;
        Ok(Self { scorer, pool })
    }

    pub fn scorer(&self) -> &TrendScorer {
        &self.scorer
    }

    pub fn score_observation(&self, observation: &Observation) -> Result<ScoreRecord> {
        self.scorer.score(observation)
    }

    pub fn process_batch(&self, observations: &[Observation]) -> BatchReport {
        let mut report = BatchReport::default();

        for (index, result) in self.score_all(observations).into_iter().enumerate() {
            match result {
                Ok(record) => report
                    .records
                    .entry(record.platform_type)
                    .or_default()
                    .push(record),
                Err(err) => report.rejected.push(reject(index, &observations[index], &err)),
            }
        }

        info!(
            scored = report.record_count(),
            rejected = report.rejected.len(),
            platforms = report.records.len(),
            "processed batch"
        );
        report
    }

    /// Highest scores across all platforms. Ties keep input order.
    pub fn top_trends(
        &self,
        observations: &[Observation],
        top_n: usize,
        min_score: u8,
    ) -> Vec<ScoreRecord> {
        let records = self
            .score_all(observations)
            .into_iter()
            .enumerate()
            .filter_map(|(index, result)| match result {
                Ok(record) => Some(record),
                Err(err) => {
                    reject(index, &observations[index], &err);
                    None
                }
            })
            .collect();
        rank_records(records, top_n, min_score)
    }

    /// One result per observation, in input order.
    fn score_all(&self, observations: &[Observation]) -> Vec<Result<ScoreRecord>> {
        let groups = group_by_history_key(observations);

        let mut scored: Vec<(usize, Result<ScoreRecord>)> = self.pool.install(|| {
            groups
                .par_iter()
                .flat_map_iter(|indices| {
                    indices
                        .iter()
                        .map(|&index| (index, self.scorer.score(&observations[index])))
                        .collect::<Vec<_>>()
                })
                .collect()
        });

        scored.sort_by_key(|(index, _)| *index);
        scored.into_iter().map(|(_, result)| result).collect()
    }
}

/// Filters to `min_score`, sorts by score descending (stable) and truncates.
pub fn rank_records(records: Vec<ScoreRecord>, top_n: usize, min_score: u8) -> Vec<ScoreRecord> {
    let mut ranked: Vec<ScoreRecord> = records
        .into_iter()
        .filter(|record| record.trend_score >= min_score)
        .collect();
    ranked.sort_by(|a, b| b.trend_score.cmp(&a.trend_score));
    ranked.truncate(top_n);
    ranked
}

/// Index groups sharing a history key, in order of first appearance.
fn group_by_history_key(observations: &[Observation]) -> Vec<Vec<usize>> {
    let mut positions: HashMap<(String, String), usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();

    for (index, observation) in observations.iter().enumerate() {
        let platform = observation
            .platform
            .parse::<Platform>()
            .map(|platform| platform.as_str().to_string())
            .unwrap_or_else(|_| observation.platform.trim().to_lowercase());
        let key = (platform, normalize_keyword(&observation.keyword));

        let position = *positions.entry(key).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[position].push(index);
    }

    groups
}

fn reject(index: usize, observation: &Observation, err: &EngineError) -> RejectedObservation {
    warn!(
        index,
        keyword = %observation.keyword,
        platform = %observation.platform,
        error = %err,
        "skipping observation"
    );
    RejectedObservation {
        index,
        keyword: observation.keyword.clone(),
        platform: observation.platform.clone(),
        reason: err.to_string(),
    }
}
