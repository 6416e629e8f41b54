use adaptive_trend::scoring::hotness::hotness;
use adaptive_trend::scoring::VelocityScorer;
use adaptive_trend::{profile_for, EngineConfig, Observation, Platform, RawMetrics, TrendScorer};
use proptest::prelude::*;

fn any_platform() -> impl Strategy<Value = Platform> {
    prop::sample::select(Platform::ALL.to_vec())
}

fn counter() -> impl Strategy<Value = Option<f64>> {
    prop::option::of(-1_000.0..1e9_f64)
}

fn raw_metrics() -> impl Strategy<Value = RawMetrics> {
    (
        counter(),
        counter(),
        counter(),
        counter(),
        counter(),
        counter(),
        counter(),
        counter(),
    )
        .prop_map(
            |(views, likes, comments, shares, saves, upvotes, downvotes, score)| RawMetrics {
                views,
                likes,
                comments,
                shares,
                saves,
                upvotes,
                downvotes,
                score,
            },
        )
}

fn in_unit_range(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every dimension stays in [0,1] and the score in [0,100].
    #[test]
    fn dimensions_and_score_are_bounded(
        platform in any_platform(),
        stats in raw_metrics(),
        previous in prop::option::of(raw_metrics()),
        posts in 0_u64..1_000_000,
        feasibility in prop::option::of(any::<u8>()),
        monetization in prop::option::of(-2.0..2.0_f64),
        ip_risk in prop::option::of(-2.0..2.0_f64),
    ) {
        let scorer = TrendScorer::with_memory_history(&EngineConfig::default());
        let mut observation = Observation::new("prop", platform.as_str(), stats, posts);
        observation.previous = previous;
        observation.externals.feasibility = feasibility;
        observation.externals.monetization = monetization;
        observation.externals.ip_risk = ip_risk;

        let record = scorer.score(&observation).unwrap();

        prop_assert!(record.trend_score <= 100);
        for value in [
            record.hotness,
            record.velocity,
            record.density,
            record.feasibility,
            record.monetization,
            record.risk,
        ] {
            prop_assert!(in_unit_range(value));
        }
    }

    /// Identical inputs produce identical records, apart from the timestamp.
    #[test]
    fn scoring_is_deterministic(
        platform in any_platform(),
        stats in raw_metrics(),
        previous in raw_metrics(),
        posts in 0_u64..100_000,
    ) {
        let scorer = TrendScorer::with_memory_history(&EngineConfig::default());
        let observation = Observation::new("prop", platform.as_str(), stats, posts)
            .with_previous(previous);

        let first = scorer.score(&observation).unwrap();
        let mut second = scorer.score(&observation).unwrap();
        second.computed_at = first.computed_at;

        prop_assert_eq!(first, second);
    }

    /// With interactions held at zero, more views never lower hotness. Fixed
    /// interactions spread over more views do lower engagement.
    #[test]
    fn hotness_is_monotonic_in_views(
        platform in prop::sample::select(vec![
            Platform::Tiktok,
            Platform::Instagram,
            Platform::Twitter,
            Platform::Youtube,
        ]),
        low in 0.0..1e9_f64,
        delta in 0.0..1e9_f64,
        posts in 0_u64..100_000,
    ) {
        let profile = profile_for(platform);
        let lower = profile.map_metrics(&RawMetrics { views: Some(low), ..RawMetrics::default() }, posts);
        let higher = profile.map_metrics(
            &RawMetrics { views: Some(low + delta), ..RawMetrics::default() },
            posts,
        );

        prop_assert!(hotness(&higher, profile) + 1e-12 >= hotness(&lower, profile));
    }

    /// Growing any current counter never lowers velocity.
    #[test]
    fn velocity_is_monotonic_in_current_metrics(
        platform in any_platform(),
        current in raw_metrics(),
        previous in raw_metrics(),
        bump in 0.0..1e6_f64,
    ) {
        let profile = profile_for(platform);
        let scorer = VelocityScorer::default();
        let previous = profile.map_metrics(&previous, 1);
        let base = profile.map_metrics(&current, 1);

        let mut grown = base;
        grown.views += bump;
        grown.likes += bump;
        grown.comments += bump;
        grown.shares += bump;
        grown.saves += bump;

        prop_assert!(
            scorer.score(&grown, Some(&previous), profile) + 1e-12
                >= scorer.score(&base, Some(&previous), profile)
        );
    }
}
