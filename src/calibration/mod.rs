pub mod comparability;
pub mod keywords;
pub mod profile;

pub use comparability::{
    hot_samples, viral_samples, ComparabilityReport, ComparabilityRunner, ComparabilitySample,
    SampleScore, Tier, TierSummary, VIEW_BASED_VIRAL_BAND,
};
pub use keywords::{KeywordCatalog, KeywordProfile, MIN_PARTIAL_MATCH_LEN};
pub use profile::{
    profile_for, profile_for_id, CompetitionSource, HotnessMix, MetricAvailability, MetricRemap,
    MetricWeights, Platform, PlatformProfile, RiskTier, REDDIT_VIEWS_PER_POINT,
};
