use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;
use crate::{MappedMetrics, RawMetrics};

/// Estimated views per point of Reddit vote score.
pub const REDDIT_VIEWS_PER_POINT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Tiktok,
    Instagram,
    Reddit,
    Twitter,
    Youtube,
    Linkedin,
}

impl Platform {
    pub const ALL: [Platform; 6] = [
        Platform::Tiktok,
        Platform::Instagram,
        Platform::Reddit,
        Platform::Twitter,
        Platform::Youtube,
        Platform::Linkedin,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Tiktok => "tiktok",
            Platform::Instagram => "instagram",
            Platform::Reddit => "reddit",
            Platform::Twitter => "twitter",
            Platform::Youtube => "youtube",
            Platform::Linkedin => "linkedin",
        }
    }

    pub fn profile(self) -> &'static PlatformProfile {
        profile_for(self)
    }
}

impl FromStr for Platform {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "tiktok" => Ok(Platform::Tiktok),
            "instagram" => Ok(Platform::Instagram),
            "reddit" => Ok(Platform::Reddit),
            "twitter" | "x" => Ok(Platform::Twitter),
            "youtube" => Ok(Platform::Youtube),
            "linkedin" => Ok(Platform::Linkedin),
            _ => Err(EngineError::UnknownPlatform(value.to_string())),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Multiplicative weight applied to each generic counter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricWeights {
    pub views: f64,
    pub likes: f64,
    pub comments: f64,
    pub shares: f64,
    pub saves: f64,
}

/// How the hotness dimension blends reach, interaction and volume. Sums to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HotnessMix {
    pub views: f64,
    pub engagement: f64,
    pub posts: f64,
}

impl HotnessMix {
    pub fn total(&self) -> f64 {
        self.views + self.engagement + self.posts
    }
}

/// Whether the platform reports each generic counter natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricAvailability {
    pub views: bool,
    pub likes: bool,
    pub comments: bool,
    pub shares: bool,
    pub saves: bool,
}

impl MetricAvailability {
    const ALL: MetricAvailability = MetricAvailability {
        views: true,
        likes: true,
        comments: true,
        shares: true,
        saves: true,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskTier {
    /// Strict lower bound on the mapped vote score.
    pub above: f64,
    pub risk: f64,
}

/// Where a platform's competition risk comes from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum CompetitionSource {
    /// Supplied by the caller, defaulting to zero.
    External,
    /// Derived from the mapped vote score, tiers checked top-down.
    Tiered(&'static [RiskTier]),
}

impl CompetitionSource {
    pub fn resolve(&self, metrics: &MappedMetrics, external: Option<f64>) -> f64 {
        match self {
            CompetitionSource::External => external.unwrap_or(0.0),
            CompetitionSource::Tiered(tiers) => tiers
                .iter()
                .find(|tier| metrics.score > tier.above)
                .map(|tier| tier.risk)
                .unwrap_or(0.0),
        }
    }
}

/// Field substitution applied before any calculator runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum MetricRemap {
    Native,
    /// Vote-based platforms: views estimated from the net score, likes from upvotes.
    VoteScore { views_per_point: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformProfile {
    pub platform: Platform,
    pub metric_weights: MetricWeights,
    pub hotness_mix: HotnessMix,
    /// Caps hotness for platforms whose data is a weak trend signal.
    pub hotness_scale: f64,
    pub monetization_multiplier: f64,
    pub competition: CompetitionSource,
    pub availability: MetricAvailability,
    pub remap: MetricRemap,
}

impl PlatformProfile {
    /// Translates native fields into the generic counters.
    pub fn map_metrics(&self, raw: &RawMetrics, posts: u64) -> MappedMetrics {
        let raw = raw.sanitized();
        let available = |flag: bool, value: Option<f64>| if flag { value.unwrap_or(0.0) } else { 0.0 };

        let mut mapped = MappedMetrics {
            views: available(self.availability.views, raw.views),
            likes: available(self.availability.likes, raw.likes),
            comments: available(self.availability.comments, raw.comments),
            shares: available(self.availability.shares, raw.shares),
            saves: available(self.availability.saves, raw.saves),
            score: raw.score.unwrap_or(0.0),
            posts,
        };

        if let MetricRemap::VoteScore { views_per_point } = self.remap {
            mapped.views = mapped.score * views_per_point;
            mapped.likes = raw.upvotes.or(raw.score).unwrap_or(0.0);
        }

        mapped
    }
}

const REDDIT_RISK_TIERS: &[RiskTier] = &[
    RiskTier {
        above: 10_000.0,
        risk: 0.6,
    },
    RiskTier {
        above: 5_000.0,
        risk: 0.4,
    },
    RiskTier {
        above: 1_000.0,
        risk: 0.2,
    },
];

static TIKTOK: PlatformProfile = PlatformProfile {
    platform: Platform::Tiktok,
    metric_weights: MetricWeights {
        views: 1.0,
        likes: 1.0,
        comments: 1.0,
        shares: 1.0,
        saves: 1.0,
    },
    hotness_mix: HotnessMix {
        views: 0.50,
        engagement: 0.30,
        posts: 0.20,
    },
    hotness_scale: 1.0,
    monetization_multiplier: 1.0,
    competition: CompetitionSource::External,
    availability: MetricAvailability::ALL,
    remap: MetricRemap::Native,
};

// Instagram crawls carry no saves and sparse interactions, so interactions weigh more.
static INSTAGRAM: PlatformProfile = PlatformProfile {
    platform: Platform::Instagram,
    metric_weights: MetricWeights {
        views: 1.0,
        likes: 1.2,
        comments: 1.3,
        shares: 1.1,
        saves: 0.0,
    },
    hotness_mix: HotnessMix {
        views: 0.35,
        engagement: 0.45,
        posts: 0.20,
    },
    hotness_scale: 1.0,
    monetization_multiplier: 1.1,
    competition: CompetitionSource::External,
    availability: MetricAvailability {
        views: true,
        likes: true,
        comments: true,
        shares: true,
        saves: false,
    },
    remap: MetricRemap::Native,
};

static YOUTUBE: PlatformProfile = PlatformProfile {
    platform: Platform::Youtube,
    metric_weights: MetricWeights {
        views: 1.3,
        likes: 1.0,
        comments: 1.5,
        shares: 0.0,
        saves: 0.0,
    },
    hotness_mix: HotnessMix {
        views: 0.65,
        engagement: 0.20,
        posts: 0.15,
    },
    hotness_scale: 1.0,
    monetization_multiplier: 1.0,
    competition: CompetitionSource::External,
    availability: MetricAvailability {
        views: true,
        likes: true,
        comments: true,
        shares: false,
        saves: false,
    },
    remap: MetricRemap::Native,
};

static TWITTER: PlatformProfile = PlatformProfile {
    platform: Platform::Twitter,
    metric_weights: MetricWeights {
        views: 0.8,
        likes: 1.0,
        comments: 1.2,
        shares: 1.5,
        saves: 0.8,
    },
    hotness_mix: HotnessMix {
        views: 0.40,
        engagement: 0.40,
        posts: 0.20,
    },
    hotness_scale: 1.0,
    monetization_multiplier: 0.9,
    competition: CompetitionSource::External,
    availability: MetricAvailability::ALL,
    remap: MetricRemap::Native,
};

/// Upvotes are remapped onto likes and keep full weight, so upvote growth
/// moves velocity.
static REDDIT: PlatformProfile = PlatformProfile {
    platform: Platform::Reddit,
    metric_weights: MetricWeights {
        views: 0.0,
        likes: 1.0,
        comments: 2.0,
        shares: 0.0,
        saves: 0.0,
    },
    hotness_mix: HotnessMix {
        views: 0.0,
        engagement: 0.70,
        posts: 0.30,
    },
    hotness_scale: 1.0,
    monetization_multiplier: 1.0,
    competition: CompetitionSource::Tiered(REDDIT_RISK_TIERS),
    availability: MetricAvailability {
        views: false,
        likes: false,
        comments: true,
        shares: false,
        saves: false,
    },
    remap: MetricRemap::VoteScore {
        views_per_point: REDDIT_VIEWS_PER_POINT,
    },
};

// LinkedIn crawls return people profiles, not posts: only the post count is usable.
static LINKEDIN: PlatformProfile = PlatformProfile {
    platform: Platform::Linkedin,
    metric_weights: MetricWeights {
        views: 0.0,
        likes: 0.0,
        comments: 0.0,
        shares: 0.0,
        saves: 0.0,
    },
    hotness_mix: HotnessMix {
        views: 0.0,
        engagement: 0.0,
        posts: 1.0,
    },
    hotness_scale: 0.3,
    monetization_multiplier: 0.5,
    competition: CompetitionSource::External,
    availability: MetricAvailability {
        views: false,
        likes: false,
        comments: false,
        shares: false,
        saves: false,
    },
    remap: MetricRemap::Native,
};

pub fn profile_for(platform: Platform) -> &'static PlatformProfile {
    match platform {
        Platform::Tiktok => &TIKTOK,
        Platform::Instagram => &INSTAGRAM,
        Platform::Reddit => &REDDIT,
        Platform::Twitter => &TWITTER,
        Platform::Youtube => &YOUTUBE,
        Platform::Linkedin => &LINKEDIN,
    }
}

/// Resolves a free-form platform identifier to its calibration profile.
pub fn profile_for_id(platform: &str) -> Result<&'static PlatformProfile, EngineError> {
    platform.parse::<Platform>().map(profile_for)
}
