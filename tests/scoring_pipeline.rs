use adaptive_trend::scoring::{AggregateScorer, Dimensions, VelocityScorer, NEUTRAL_VELOCITY};
use adaptive_trend::{
    profile_for, EngineConfig, Externals, Lifecycle, Observation, Platform, Priority, RawMetrics,
    TrendScorer,
};

fn scorer() -> TrendScorer {
    TrendScorer::with_memory_history(&EngineConfig::default())
}

fn tiktok_stats() -> RawMetrics {
    RawMetrics {
        views: Some(2_000_000.0),
        likes: Some(120_000.0),
        comments: Some(5_000.0),
        shares: Some(3_000.0),
        saves: Some(8_000.0),
        ..RawMetrics::default()
    }
}

#[test]
fn tiktok_observation_scores_end_to_end() {
    let observation = Observation::new("ai headshot", "tiktok", tiktok_stats(), 50).with_externals(
        Externals {
            feasibility: Some(5),
            monetization: Some(0.9),
            ip_risk: Some(0.1),
            competition_risk: Some(0.1),
            category: None,
        },
    );

    let record = scorer().score(&observation).unwrap();

    assert_eq!(record.trend_score, 62);
    assert_eq!(record.platform_type, Platform::Tiktok);
    assert!((record.hotness - 0.521).abs() < 1e-9);
    assert!((record.velocity - 0.5).abs() < 1e-9);
    assert!((record.density - 0.427).abs() < 1e-9);
    assert!((record.feasibility - 1.0).abs() < 1e-9);
    assert!((record.monetization - 0.9).abs() < 1e-9);
    assert!((record.risk - 0.1).abs() < 1e-9);
    assert_eq!(record.lifecycle, Lifecycle::Stable);
    assert_eq!(record.priority, Priority::P2);
    assert!(!record.agent_ready);
    assert_eq!(record.category, "portrait");
}

#[test]
fn aggregate_subtracts_risk_and_clamps() {
    let scorer = AggregateScorer::default();
    let perfect = Dimensions {
        hotness: 1.0,
        velocity: 1.0,
        density: 1.0,
        feasibility: 1.0,
        monetization: 1.0,
        risk: 0.0,
    };
    assert!((scorer.raw(&perfect) - 1.0).abs() < 1e-9);
    assert_eq!(scorer.score(&perfect), 100);

    let hopeless = Dimensions {
        hotness: 0.0,
        velocity: 0.0,
        density: 0.0,
        feasibility: 0.0,
        monetization: 0.0,
        risk: 1.0,
    };
    assert!((scorer.raw(&hopeless) + 0.25).abs() < 1e-9);
    assert_eq!(scorer.score(&hopeless), 0);
}

#[test]
fn missing_externals_fall_back_to_defaults() {
    let observation = Observation::new("quantum knitting", "tiktok", RawMetrics::default(), 0);

    let record = scorer().score(&observation).unwrap();

    assert!((record.hotness - 0.0).abs() < 1e-9);
    assert!((record.velocity - NEUTRAL_VELOCITY).abs() < 1e-9);
    assert!((record.feasibility - 0.6).abs() < 1e-9);
    assert!((record.monetization - 0.5).abs() < 1e-9);
    assert!((record.risk - 0.12).abs() < 1e-9);
    assert_eq!(record.trend_score, 31);
    assert_eq!(record.category, "general");
    assert_eq!(record.priority, Priority::P3);
}

#[test]
fn feasibility_defaults_even_for_catalog_keywords() {
    let stats = RawMetrics {
        views: Some(1_000_000.0),
        likes: Some(50_000.0),
        ..RawMetrics::default()
    };

    for keyword in ["ai headshot", "ai", "remove"] {
        let observation = Observation::new(keyword, "tiktok", stats.clone(), 20);

        let record = scorer().score(&observation).unwrap();

        assert!(
            (record.feasibility - 0.6).abs() < 1e-9,
            "{} scored F = {}",
            keyword,
            record.feasibility
        );
    }

    let record = scorer()
        .score(&Observation::new("ai headshot", "tiktok", stats, 20))
        .unwrap();
    // The catalog still supplies monetization and category.
    assert!((record.monetization - 0.9).abs() < 1e-9);
    assert_eq!(record.category, "portrait");
}

#[test]
fn observation_externals_override_catalog() {
    let observation = Observation::new("anime filter", "tiktok", RawMetrics::default(), 0)
        .with_externals(Externals {
            feasibility: Some(1),
            category: Some("custom".to_string()),
            ..Externals::default()
        });

    let record = scorer().score(&observation).unwrap();

    assert!((record.feasibility - 0.2).abs() < 1e-9);
    // Catalog still supplies monetization for anime filter.
    assert!((record.monetization - 0.7).abs() < 1e-9);
    assert_eq!(record.category, "custom");
}

#[test]
fn negative_counters_are_treated_as_zero() {
    let stats = RawMetrics {
        views: Some(-500.0),
        likes: Some(f64::NAN),
        ..RawMetrics::default()
    };
    let observation = Observation::new("dance", "tiktok", stats, 0);

    let record = scorer().score(&observation).unwrap();

    assert_eq!(record.raw_metrics.views, 0.0);
    assert_eq!(record.raw_metrics.likes, 0.0);
    assert!((record.hotness - 0.0).abs() < 1e-9);
}

#[test]
fn unknown_platform_is_rejected() {
    let observation = Observation::new("dance", "myspace", RawMetrics::default(), 3);

    let err = scorer().score(&observation).unwrap_err();

    assert!(err.to_string().contains("myspace"));
}

#[test]
fn velocity_is_neutral_without_previous() {
    let scorer = VelocityScorer::default();
    let profile = profile_for(Platform::Tiktok);
    let current = profile.map_metrics(&tiktok_stats(), 50);

    assert!((scorer.score(&current, None, profile) - 0.5).abs() < 1e-9);
}

#[test]
fn velocity_maps_growth_onto_unit_range() {
    let scorer = VelocityScorer::default();
    let profile = profile_for(Platform::Tiktok);
    let current = profile.map_metrics(
        &RawMetrics {
            views: Some(2_000_000.0),
            likes: Some(100_000.0),
            ..RawMetrics::default()
        },
        10,
    );
    let previous = profile.map_metrics(
        &RawMetrics {
            views: Some(1_000_000.0),
            likes: Some(100_000.0),
            ..RawMetrics::default()
        },
        10,
    );

    // Views doubled (0.45 x 100%), likes flat.
    let velocity = scorer.score(&current, Some(&previous), profile);
    assert!((velocity - 0.3625).abs() < 1e-9);
}

#[test]
fn all_zero_previous_snapshot_reads_as_flat() {
    let scorer = VelocityScorer::default();
    let profile = profile_for(Platform::Tiktok);
    let current = profile.map_metrics(
        &RawMetrics {
            views: Some(2_000_000.0),
            ..RawMetrics::default()
        },
        10,
    );
    let previous = profile.map_metrics(&RawMetrics::default(), 10);

    let velocity = scorer.score(&current, Some(&previous), profile);
    assert!((velocity - 0.25).abs() < 1e-9);
}

#[test]
fn collapsed_metrics_floor_velocity_at_zero() {
    let scorer = VelocityScorer::default();
    let profile = profile_for(Platform::Tiktok);
    let current = profile.map_metrics(&RawMetrics::default(), 0);
    let previous = profile.map_metrics(
        &RawMetrics {
            views: Some(1_000.0),
            likes: Some(100.0),
            comments: Some(10.0),
            shares: Some(5.0),
            saves: Some(5.0),
            ..RawMetrics::default()
        },
        1,
    );

    assert!((scorer.score(&current, Some(&previous), profile) - 0.0).abs() < 1e-9);
}

#[test]
fn reddit_explicit_previous_drives_velocity_and_tiered_risk() {
    let observation = Observation::new(
        "dance",
        "reddit",
        RawMetrics {
            upvotes: Some(12_000.0),
            score: Some(11_000.0),
            comments: Some(800.0),
            ..RawMetrics::default()
        },
        40,
    )
    .with_previous(RawMetrics {
        upvotes: Some(6_000.0),
        score: Some(5_500.0),
        comments: Some(400.0),
        ..RawMetrics::default()
    });

    let record = scorer().score(&observation).unwrap();

    // Upvote growth counts through the likes weight: 0.25 + 0.15 x 2.
    assert!((record.velocity - 0.3875).abs() < 1e-3);
    // 0.6 x ip 0.2 + 0.4 x tier 0.6
    assert!((record.risk - 0.36).abs() < 1e-9);
    assert_eq!(record.trend_score, 34);
}

#[test]
fn record_serializes_with_dimension_letters() {
    let observation = Observation::new("music", "x", tiktok_stats(), 12);
    let record = scorer().score(&observation).unwrap();

    let value = serde_json::to_value(&record).unwrap();

    for key in [
        "keyword",
        "platform",
        "platform_type",
        "trend_score",
        "H",
        "V",
        "D",
        "F",
        "M",
        "R",
        "lifecycle",
        "priority",
        "agent_ready",
        "category",
        "raw_metrics",
        "computed_at",
    ] {
        assert!(value.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(value["platform"], "x");
    assert_eq!(value["platform_type"], "twitter");
}
