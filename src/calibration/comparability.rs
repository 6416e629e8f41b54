use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::calibration::Platform;
use crate::scoring::TrendScorer;
use crate::{Externals, Observation, RawMetrics};

/// Maximum score gap among the view-based platforms at the viral tier.
pub const VIEW_BASED_VIRAL_BAND: u8 = 6;

/// Platforms whose hotness is driven by a native view counter.
pub const VIEW_BASED_PLATFORMS: [Platform; 4] = [
    Platform::Tiktok,
    Platform::Instagram,
    Platform::Twitter,
    Platform::Youtube,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Viral,
    Hot,
}

impl Tier {
    /// Higher rank means the tier should score higher.
    pub fn rank(self) -> u8 {
        match self {
            Tier::Viral => 2,
            Tier::Hot => 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparabilitySample {
    pub name: String,
    pub tier: Tier,
    pub platform: Platform,
    pub keyword: String,
    pub stats: RawMetrics,
    pub posts: u64,
    #[serde(default)]
    pub feasibility: Option<u8>,
}

impl ComparabilitySample {
    /// Replays never write to the velocity history.
    pub fn to_observation(&self) -> Observation {
        Observation::new(
            self.keyword.clone(),
            self.platform.as_str(),
            self.stats.clone(),
            self.posts,
        )
        .with_externals(Externals {
            feasibility: self.feasibility,
            ..Externals::default()
        })
        .without_history_update()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleScore {
    pub name: String,
    pub tier: Tier,
    pub platform: Platform,
    pub trend_score: u8,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TierSummary {
    pub samples: usize,
    pub min: u8,
    pub max: u8,
    pub mean: f64,
    pub spread: u8,
    /// Spread restricted to the view-based platforms.
    pub view_based_spread: u8,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComparabilityReport {
    pub tiers: BTreeMap<Tier, TierSummary>,
    pub tier_ordering_accuracy: f64,
    pub scores: Vec<SampleScore>,
    pub sample_count: usize,
}

impl ComparabilityReport {
    pub fn tier(&self, tier: Tier) -> Option<&TierSummary> {
        self.tiers.get(&tier)
    }

    pub fn within_viral_band(&self) -> bool {
        self.tier(Tier::Viral)
            .map(|summary| summary.view_based_spread <= VIEW_BASED_VIRAL_BAND)
            .unwrap_or(true)
    }
}

pub struct ComparabilityRunner {
    pub samples: Vec<ComparabilitySample>,
}

impl ComparabilityRunner {
    pub fn new(samples: Vec<ComparabilitySample>) -> Self {
        Self { samples }
    }

    /// Viral and hot tiers for every view-based platform plus Reddit.
    pub fn builtin() -> Self {
        let mut samples = viral_samples();
        samples.extend(hot_samples());
        Self::new(samples)
    }

    /// Samples that fail to score are left out of the report.
    pub fn compute_metrics(&self, scorer: &TrendScorer) -> ComparabilityReport {
        if self.samples.is_empty() {
            return ComparabilityReport::default();
        }

        let scores: Vec<SampleScore> = self
            .samples
            .iter()
            .filter_map(|sample| {
                scorer
                    .score(&sample.to_observation())
                    .ok()
                    .map(|record| SampleScore {
                        name: sample.name.clone(),
                        tier: sample.tier,
                        platform: sample.platform,
                        trend_score: record.trend_score,
                    })
            })
            .collect();

        let mut tiers = BTreeMap::new();
        for tier in [Tier::Viral, Tier::Hot] {
            let in_tier: Vec<&SampleScore> =
                scores.iter().filter(|score| score.tier == tier).collect();
            if !in_tier.is_empty() {
                tiers.insert(tier, summarize(&in_tier));
            }
        }

        ComparabilityReport {
            tiers,
            tier_ordering_accuracy: ordering_accuracy(&scores),
            sample_count: scores.len(),
            scores,
        }
    }
}

fn summarize(scores: &[&SampleScore]) -> TierSummary {
    let values: Vec<u8> = scores.iter().map(|score| score.trend_score).collect();
    let view_based: Vec<u8> = scores
        .iter()
        .filter(|score| VIEW_BASED_PLATFORMS.contains(&score.platform))
        .map(|score| score.trend_score)
        .collect();

    let min = values.iter().copied().min().unwrap_or(0);
    let max = values.iter().copied().max().unwrap_or(0);
    let mean = values.iter().map(|value| *value as f64).sum::<f64>() / values.len() as f64;

    TierSummary {
        samples: values.len(),
        min,
        max,
        mean,
        spread: max - min,
        view_based_spread: spread(&view_based),
    }
}

fn spread(values: &[u8]) -> u8 {
    match (values.iter().max(), values.iter().min()) {
        (Some(max), Some(min)) => max - min,
        _ => 0,
    }
}

/// Fraction of same-platform, different-tier pairs where the higher tier
/// scores at least as high.
fn ordering_accuracy(scores: &[SampleScore]) -> f64 {
    let mut correct = 0usize;
    let mut total = 0usize;

    for i in 0..scores.len() {
        for j in (i + 1)..scores.len() {
            let (a, b) = (&scores[i], &scores[j]);
            if a.platform != b.platform || a.tier == b.tier {
                continue;
            }
            let (higher, lower) = if a.tier.rank() > b.tier.rank() {
                (a, b)
            } else {
                (b, a)
            };
            if higher.trend_score >= lower.trend_score {
                correct += 1;
            }
            total += 1;
        }
    }

    if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    }
}

fn views_sample(
    tier: Tier,
    platform: Platform,
    keyword: &str,
    counters: [f64; 5],
    posts: u64,
) -> ComparabilitySample {
    let [views, likes, comments, shares, saves] = counters;
    let present = |value: f64| (value > 0.0).then_some(value);
    ComparabilitySample {
        name: format!("{}-{}", platform, tier_label(tier)),
        tier,
        platform,
        keyword: keyword.to_string(),
        stats: RawMetrics {
            views: Some(views),
            likes: Some(likes),
            comments: Some(comments),
            shares: present(shares),
            saves: present(saves),
            ..RawMetrics::default()
        },
        posts,
        feasibility: Some(tier_feasibility(tier)),
    }
}

fn reddit_sample(
    tier: Tier,
    keyword: &str,
    votes: [f64; 3],
    comments: f64,
    posts: u64,
) -> ComparabilitySample {
    let [upvotes, downvotes, score] = votes;
    ComparabilitySample {
        name: format!("reddit-{}", tier_label(tier)),
        tier,
        platform: Platform::Reddit,
        keyword: keyword.to_string(),
        stats: RawMetrics {
            upvotes: Some(upvotes),
            downvotes: Some(downvotes),
            score: Some(score),
            comments: Some(comments),
            ..RawMetrics::default()
        },
        posts,
        feasibility: Some(tier_feasibility(tier)),
    }
}

/// Viral samples are the easier builds.
fn tier_feasibility(tier: Tier) -> u8 {
    match tier {
        Tier::Viral => 5,
        Tier::Hot => 4,
    }
}

fn tier_label(tier: Tier) -> &'static str {
    match tier {
        Tier::Viral => "viral",
        Tier::Hot => "hot",
    }
}

pub fn viral_samples() -> Vec<ComparabilitySample> {
    let keyword = "ai headshot";
    vec![
        views_sample(
            Tier::Viral,
            Platform::Tiktok,
            keyword,
            [50_000_000.0, 3_000_000.0, 150_000.0, 80_000.0, 200_000.0],
            500,
        ),
        views_sample(
            Tier::Viral,
            Platform::Instagram,
            keyword,
            [30_000_000.0, 2_000_000.0, 100_000.0, 50_000.0, 0.0],
            400,
        ),
        views_sample(
            Tier::Viral,
            Platform::Twitter,
            keyword,
            [20_000_000.0, 800_000.0, 30_000.0, 100_000.0, 50_000.0],
            300,
        ),
        views_sample(
            Tier::Viral,
            Platform::Youtube,
            keyword,
            [100_000_000.0, 2_000_000.0, 80_000.0, 0.0, 0.0],
            200,
        ),
        reddit_sample(Tier::Viral, keyword, [50_000.0, 2_000.0, 48_000.0], 3_000.0, 100),
    ]
}

pub fn hot_samples() -> Vec<ComparabilitySample> {
    let keyword = "anime filter";
    vec![
        views_sample(
            Tier::Hot,
            Platform::Tiktok,
            keyword,
            [5_000_000.0, 300_000.0, 15_000.0, 8_000.0, 20_000.0],
            100,
        ),
        views_sample(
            Tier::Hot,
            Platform::Instagram,
            keyword,
            [3_000_000.0, 200_000.0, 10_000.0, 5_000.0, 0.0],
            80,
        ),
        views_sample(
            Tier::Hot,
            Platform::Twitter,
            keyword,
            [2_000_000.0, 50_000.0, 3_000.0, 10_000.0, 5_000.0],
            60,
        ),
        views_sample(
            Tier::Hot,
            Platform::Youtube,
            keyword,
            [10_000_000.0, 200_000.0, 8_000.0, 0.0, 0.0],
            50,
        ),
        reddit_sample(Tier::Hot, keyword, [8_000.0, 500.0, 7_500.0], 500.0, 30),
    ]
}
