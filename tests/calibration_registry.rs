use adaptive_trend::calibration::{profile_for_id, CompetitionSource, MetricRemap};
use adaptive_trend::scoring::hotness::{engagement, hotness};
use adaptive_trend::{profile_for, EngineConfig, Observation, Platform, RawMetrics, TrendScorer};
use rstest::rstest;

#[rstest]
#[case("tiktok", Platform::Tiktok)]
#[case("  TikTok ", Platform::Tiktok)]
#[case("INSTAGRAM", Platform::Instagram)]
#[case("x", Platform::Twitter)]
#[case("Twitter", Platform::Twitter)]
#[case("youtube", Platform::Youtube)]
#[case("reddit", Platform::Reddit)]
#[case("linkedin", Platform::Linkedin)]
fn platform_identifiers_parse(#[case] id: &str, #[case] expected: Platform) {
    assert_eq!(id.parse::<Platform>().unwrap(), expected);
    assert_eq!(profile_for_id(id).unwrap().platform, expected);
}

#[rstest]
#[case("myspace")]
#[case("")]
#[case("tik tok")]
fn unknown_platforms_fail(#[case] id: &str) {
    assert!(profile_for_id(id).is_err());
}

#[test]
fn hotness_mixes_sum_to_one() {
    for platform in Platform::ALL {
        let mix = profile_for(platform).hotness_mix;
        assert!((mix.total() - 1.0).abs() < 1e-9, "{} mix", platform);
    }
}

#[test]
fn unavailable_metrics_carry_no_weight() {
    for platform in Platform::ALL {
        let profile = profile_for(platform);
        let (available, weights) = (profile.availability, profile.metric_weights);
        if !available.shares {
            assert_eq!(weights.shares, 0.0, "{} shares", platform);
        }
        if !available.saves {
            assert_eq!(weights.saves, 0.0, "{} saves", platform);
        }
    }
}

#[test]
fn instagram_drops_saves_during_mapping() {
    let profile = profile_for(Platform::Instagram);
    let mapped = profile.map_metrics(
        &RawMetrics {
            views: Some(1_000.0),
            saves: Some(400.0),
            ..RawMetrics::default()
        },
        3,
    );

    assert_eq!(mapped.saves, 0.0);
    assert_eq!(mapped.views, 1_000.0);
    assert_eq!(mapped.posts, 3);
}

#[test]
fn reddit_maps_vote_score_to_views_and_upvotes_to_likes() {
    let profile = profile_for(Platform::Reddit);
    assert!(matches!(profile.remap, MetricRemap::VoteScore { .. }));

    let mapped = profile.map_metrics(
        &RawMetrics {
            upvotes: Some(1_200.0),
            downvotes: Some(100.0),
            score: Some(1_100.0),
            comments: Some(40.0),
            views: Some(999_999.0),
            ..RawMetrics::default()
        },
        5,
    );

    assert_eq!(mapped.views, 11_000.0);
    assert_eq!(mapped.likes, 1_200.0);
    assert_eq!(mapped.comments, 40.0);
    assert_eq!(mapped.score, 1_100.0);
}

#[test]
fn reddit_likes_fall_back_to_score_without_upvotes() {
    let mapped = profile_for(Platform::Reddit).map_metrics(
        &RawMetrics {
            score: Some(300.0),
            ..RawMetrics::default()
        },
        1,
    );

    assert_eq!(mapped.likes, 300.0);
}

#[rstest]
#[case(500.0, 0.0)]
#[case(1_000.0, 0.0)]
#[case(1_500.0, 0.2)]
#[case(7_500.0, 0.4)]
#[case(48_000.0, 0.6)]
fn reddit_competition_is_tiered_on_score(#[case] score: f64, #[case] expected: f64) {
    let profile = profile_for(Platform::Reddit);
    let mapped = profile.map_metrics(
        &RawMetrics {
            score: Some(score),
            ..RawMetrics::default()
        },
        1,
    );

    // External values are ignored for tiered platforms.
    let risk = profile.competition.resolve(&mapped, Some(0.9));
    assert!((risk - expected).abs() < 1e-9);
}

#[test]
fn view_platforms_take_external_competition() {
    let profile = profile_for(Platform::Youtube);
    assert_eq!(profile.competition, CompetitionSource::External);
    let mapped = profile.map_metrics(&RawMetrics::default(), 0);

    assert!((profile.competition.resolve(&mapped, Some(0.3)) - 0.3).abs() < 1e-9);
    assert!((profile.competition.resolve(&mapped, None) - 0.0).abs() < 1e-9);
}

#[test]
fn engagement_saturates_at_half_rate() {
    let profile = profile_for(Platform::Tiktok);
    let mapped = profile.map_metrics(
        &RawMetrics {
            views: Some(100.0),
            likes: Some(500.0),
            ..RawMetrics::default()
        },
        0,
    );

    assert!((engagement(&mapped) - 1.0).abs() < 1e-9);
}

#[test]
fn engagement_ignores_platform_metric_weights() {
    let instagram = profile_for(Platform::Instagram);
    let mapped = instagram.map_metrics(
        &RawMetrics {
            views: Some(1_000.0),
            likes: Some(100.0),
            ..RawMetrics::default()
        },
        0,
    );
    assert!((engagement(&mapped) - 0.2).abs() < 1e-9);

    // Reddit views come from the vote score: 1000 x 10 views, 100 + 2 x 100
    // interactions.
    let reddit = profile_for(Platform::Reddit);
    let mapped = reddit.map_metrics(
        &RawMetrics {
            score: Some(1_000.0),
            upvotes: Some(100.0),
            comments: Some(100.0),
            ..RawMetrics::default()
        },
        0,
    );
    assert!((engagement(&mapped) - 0.06).abs() < 1e-9);
}

#[test]
fn extra_views_dilute_engagement_when_interactions_are_fixed() {
    let profile = profile_for(Platform::Instagram);
    let at = |views: f64| {
        profile.map_metrics(
            &RawMetrics {
                views: Some(views),
                likes: Some(100.0),
                ..RawMetrics::default()
            },
            0,
        )
    };

    // 0.35 x views_norm gains less than 0.45 x engagement loses.
    assert!(hotness(&at(2_000.0), profile) < hotness(&at(1_000.0), profile));
}

#[test]
fn linkedin_hotness_is_capped_by_scale() {
    let profile = profile_for(Platform::Linkedin);
    let mapped = profile.map_metrics(
        &RawMetrics {
            views: Some(50_000_000.0),
            likes: Some(1_000_000.0),
            ..RawMetrics::default()
        },
        10_000,
    );

    assert_eq!(mapped.views, 0.0);
    assert!((hotness(&mapped, profile) - 0.3).abs() < 1e-9);
}

#[test]
fn linkedin_scores_from_post_volume_only() {
    let scorer = TrendScorer::with_memory_history(&EngineConfig::default());
    let observation = Observation::new("quantum knitting", "linkedin", RawMetrics::default(), 50);

    let record = scorer.score(&observation).unwrap();

    assert!((record.hotness - 0.128).abs() < 1e-9);
    assert!((record.monetization - 0.25).abs() < 1e-9);
    assert_eq!(record.trend_score, 35);
}
