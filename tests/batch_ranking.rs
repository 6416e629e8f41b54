use adaptive_trend::calibration::viral_samples;
use adaptive_trend::config::BatchConfig;
use adaptive_trend::{
    rank_records, BatchProcessor, EngineConfig, Observation, Platform, RawMetrics, TrendScorer,
};

fn processor(workers: usize) -> BatchProcessor {
    let config = EngineConfig::default();
    let scorer = TrendScorer::with_memory_history(&config);
    BatchProcessor::new(
        scorer,
        &BatchConfig {
            workers,
            ..BatchConfig::default()
        },
    )
    .unwrap()
}

fn views(value: f64) -> RawMetrics {
    RawMetrics {
        views: Some(value),
        ..RawMetrics::default()
    }
}

fn viral_observations() -> Vec<Observation> {
    viral_samples()
        .iter()
        .map(|sample| sample.to_observation())
        .collect()
}

#[test]
fn process_batch_groups_records_by_platform() {
    let report = processor(2).process_batch(&viral_observations());

    assert!(report.rejected.is_empty());
    assert_eq!(report.record_count(), 5);
    assert_eq!(report.records.len(), 5);
    assert_eq!(report.records[&Platform::Reddit][0].trend_score, 54);
    assert_eq!(report.records[&Platform::Youtube][0].trend_score, 72);
}

#[test]
fn unknown_platforms_are_rejected_without_failing_the_batch() {
    let observations = vec![
        Observation::new("dance", "tiktok", views(1_000.0), 1),
        Observation::new("dance", "friendster", views(1_000.0), 1),
        Observation::new("dance", "x", views(1_000.0), 1),
    ];

    let report = processor(0).process_batch(&observations);

    assert_eq!(report.record_count(), 2);
    assert_eq!(report.rejected.len(), 1);
    let rejected = &report.rejected[0];
    assert_eq!(rejected.index, 1);
    assert_eq!(rejected.platform, "friendster");
    assert!(rejected.reason.contains("friendster"));
}

#[test]
fn same_key_observations_advance_history_in_input_order() {
    let observations = vec![
        Observation::new("dance", "tiktok", views(1_000_000.0), 10),
        Observation::new("music", "tiktok", views(5_000.0), 1),
        Observation::new("#DANCE", "TikTok", views(2_000_000.0), 10),
        Observation::new("dance", "youtube", views(9_000.0), 1),
        Observation::new("dance", "tiktok", views(2_000_000.0), 10),
    ];

    let report = processor(4).process_batch(&observations);
    let tiktok = &report.records[&Platform::Tiktok];

    assert_eq!(tiktok.len(), 4);
    assert_eq!(tiktok[0].keyword, "dance");
    assert!((tiktok[0].velocity - 0.5).abs() < 1e-9);
    assert_eq!(tiktok[1].keyword, "music");
    assert_eq!(tiktok[2].keyword, "#DANCE");
    assert!((tiktok[2].velocity - 0.3625).abs() < 1e-3);
    assert!((tiktok[3].velocity - 0.25).abs() < 1e-9);
    assert!((report.records[&Platform::Youtube][0].velocity - 0.5).abs() < 1e-9);
}

#[test]
fn top_trends_filters_sorts_and_truncates() {
    let top = processor(2).top_trends(&viral_observations(), 3, 60);

    let ranked: Vec<(Platform, u8)> = top
        .iter()
        .map(|record| (record.platform_type, record.trend_score))
        .collect();
    assert_eq!(
        ranked,
        vec![
            (Platform::Tiktok, 72),
            (Platform::Youtube, 72),
            (Platform::Instagram, 69),
        ]
    );
}

#[test]
fn top_trends_drops_everything_below_the_minimum() {
    let top = processor(1).top_trends(&viral_observations(), 10, 70);

    assert_eq!(top.len(), 2);
    assert!(top.iter().all(|record| record.trend_score >= 70));
}

#[test]
fn rank_records_keeps_input_order_for_ties() {
    let scorer = TrendScorer::with_memory_history(&EngineConfig::default());
    let mut records: Vec<_> = ["alpha", "beta", "gamma", "delta"]
        .iter()
        .map(|keyword| {
            scorer
                .score(&Observation::new(*keyword, "tiktok", views(10.0), 1))
                .unwrap()
        })
        .collect();
    records[0].trend_score = 40;
    records[1].trend_score = 80;
    records[2].trend_score = 40;
    records[3].trend_score = 80;

    let ranked = rank_records(records.clone(), 10, 0);
    let keywords: Vec<&str> = ranked.iter().map(|record| record.keyword.as_str()).collect();
    assert_eq!(keywords, vec!["beta", "delta", "alpha", "gamma"]);

    assert_eq!(rank_records(records.clone(), 1, 0)[0].keyword, "beta");
    assert!(rank_records(records, 10, 90).is_empty());
}

#[test]
fn single_observation_path_matches_batch() {
    let processor = processor(1);
    let observation = Observation::new("ai headshot", "youtube", views(1_000.0), 2)
        .without_history_update();

    let single = processor.score_observation(&observation).unwrap();
    let batch = processor.process_batch(std::slice::from_ref(&observation));

    assert_eq!(
        single.trend_score,
        batch.records[&Platform::Youtube][0].trend_score
    );
}
