//! Integration tests for WerSig
//!
//! These tests verify the end-to-end behavior of the significance engine,
//! from input files to reports.

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::collections::BTreeMap;
use wersig::{
    Dataset, IntervalMethod, Record, ReportMeta, SamplingMode, SignificanceConfig,
    SignificanceTest, Verdict, compute_significance, generate_csv_report, generate_json_report,
    read_annotated, read_paired, wer_change,
};

fn rng(seed: u64) -> Xoshiro256PlusPlus {
    Xoshiro256PlusPlus::seed_from_u64(seed)
}

/// Two speakers; speaker 1 benefits from model B, speaker 2 barely changes
fn speaker_dataset() -> Dataset {
    let mut blocks = BTreeMap::new();
    blocks.insert(
        "spk1".to_string(),
        (0..40)
            .map(|i| Record::new(6 + i % 3, 3 + i % 2, 20))
            .collect::<Vec<_>>(),
    );
    blocks.insert(
        "spk2".to_string(),
        (0..25)
            .map(|i| Record::new(2 + i % 2, 2 + (i + 1) % 2, 15))
            .collect::<Vec<_>>(),
    );
    Dataset::from_blocks(blocks).unwrap()
}

/// Same seed, same dataset, same parameters: bit-identical results
#[test]
fn test_deterministic_for_fixed_seed() {
    let config = SignificanceConfig {
        total_batch: 2_000,
        num_samples_per_batch: 30,
        ..Default::default()
    };
    let test = SignificanceTest::new(config).unwrap();
    let dataset = speaker_dataset();

    let a = test.distribution(&dataset, &mut rng(2024)).unwrap();
    let b = test.distribution(&dataset, &mut rng(2024)).unwrap();
    assert_eq!(a.samples(), b.samples());

    let c = test.distribution(&dataset, &mut rng(2025)).unwrap();
    assert_ne!(a.samples(), c.samples());
}

/// Serial and rayon-parallel resampling agree exactly
#[test]
fn test_serial_and_parallel_agree() {
    let base = SignificanceConfig {
        total_batch: 3_000,
        num_samples_per_batch: 20,
        sampling: SamplingMode::BlockStratified,
        ..Default::default()
    };
    let serial = compute_significance(
        &speaker_dataset(),
        &SignificanceConfig {
            parallel: false,
            ..base.clone()
        },
        &mut rng(7),
    )
    .unwrap();
    let parallel = compute_significance(
        &speaker_dataset(),
        &SignificanceConfig {
            parallel: true,
            ..base
        },
        &mut rng(7),
    )
    .unwrap();
    assert_eq!(serial, parallel);
}

/// One-block stratification reduces to pooled resampling
#[test]
fn test_single_block_stratified_matches_pooled() {
    let dataset = Dataset::single_block(
        (0..50)
            .map(|i| Record::new(i % 5, (i + 2) % 4, 10 + i % 7))
            .collect(),
    )
    .unwrap();
    let pooled = SignificanceConfig {
        total_batch: 1_000,
        num_samples_per_batch: 25,
        parallel: false,
        ..Default::default()
    };
    let stratified = SignificanceConfig {
        sampling: SamplingMode::BlockStratified,
        ..pooled.clone()
    };

    let a = SignificanceTest::new(pooled)
        .unwrap()
        .distribution(&dataset, &mut rng(99))
        .unwrap();
    let b = SignificanceTest::new(stratified)
        .unwrap()
        .distribution(&dataset, &mut rng(99))
        .unwrap();
    assert_eq!(a.samples(), b.samples());
}

/// Stratified runs truncate the batch to whole per-block shares and omit the
/// absolute difference; pooled runs on the same data keep both
#[test]
fn test_stratified_versus_pooled_result() {
    let pooled_config = SignificanceConfig {
        total_batch: 2_000,
        num_samples_per_batch: 65,
        ..Default::default()
    };
    let stratified_config = SignificanceConfig {
        sampling: SamplingMode::BlockStratified,
        ..pooled_config.clone()
    };
    let dataset = speaker_dataset();

    let pooled = compute_significance(&dataset, &pooled_config, &mut rng(1)).unwrap();
    let stratified = compute_significance(&dataset, &stratified_config, &mut rng(1)).unwrap();

    assert_eq!(pooled.samples_per_batch(), 65);
    assert_eq!(
        pooled.absolute_difference(),
        Some(wer_change(dataset.pooled()).unwrap())
    );
    assert_eq!(pooled.sampling(), SamplingMode::Pooled);

    // 65 / 2 blocks = 32 per block
    assert_eq!(stratified.samples_per_batch(), 64);
    assert_eq!(stratified.absolute_difference(), None);
    assert_eq!(stratified.sampling(), SamplingMode::BlockStratified);

    assert_ne!(pooled.ci_low(), stratified.ci_low());
    for result in [&pooled, &stratified] {
        assert!(result.ci_low() <= result.ci_high());
        assert!(result.is_significant());
    }
}

/// Percentile bounds are the alpha / 1 - alpha percentiles of the same run
#[test]
fn test_percentile_bounds_from_same_distribution() {
    let test = SignificanceTest::new(SignificanceConfig {
        total_batch: 5_000,
        num_samples_per_batch: 40,
        confidence_level: 0.95,
        method: IntervalMethod::Percentile,
        ..Default::default()
    })
    .unwrap();
    let dataset = speaker_dataset();
    let dist = test.distribution(&dataset, &mut rng(31)).unwrap();
    let result = test.summarize(&dataset, &dist).unwrap();

    let mut sorted = dist.samples().to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let rank = |p: f64| p * (sorted.len() - 1) as f64;
    let interpolate = |r: f64| {
        let lo = r.floor() as usize;
        let hi = (lo + 1).min(sorted.len() - 1);
        sorted[lo] + (r - lo as f64) * (sorted[hi] - sorted[lo])
    };

    assert!((result.ci_low() - interpolate(rank(0.025))).abs() < 1e-12);
    assert!((result.ci_high() - interpolate(rank(0.975))).abs() < 1e-12);
}

/// The worked three-item example: B makes 13 fewer errors in 300 words
#[test]
fn test_three_item_scenario() {
    let dataset = Dataset::single_block(vec![
        Record::new(10, 5, 100),
        Record::new(8, 8, 100),
        Record::new(12, 4, 100),
    ])
    .unwrap();
    assert!((wer_change(dataset.pooled()).unwrap() + 0.043_333).abs() < 1e-5);

    let gaussian = compute_significance(
        &dataset,
        &SignificanceConfig {
            total_batch: 10_000,
            num_samples_per_batch: 3,
            method: IntervalMethod::Gaussian,
            ..Default::default()
        },
        &mut rng(42),
    )
    .unwrap();
    assert!((gaussian.point_estimate() + 0.0433).abs() < 0.002);
    assert!(gaussian.is_significant());
    assert_eq!(gaussian.verdict(), Verdict::Improvement);
}

/// Gaussian intervals are symmetric around the bootstrap mean
#[test]
fn test_gaussian_symmetry() {
    for level in [0.90, 0.95, 0.99] {
        let result = compute_significance(
            &speaker_dataset(),
            &SignificanceConfig {
                total_batch: 1_000,
                num_samples_per_batch: 30,
                confidence_level: level,
                method: IntervalMethod::Gaussian,
                ..Default::default()
            },
            &mut rng(5),
        )
        .unwrap();
        let below = result.point_estimate() - result.ci_low();
        let above = result.ci_high() - result.point_estimate();
        assert!((below - above).abs() < 1e-12);
    }
}

/// Files on disk through to JSON and CSV reports
#[test]
fn test_files_to_reports() {
    let dir = tempfile::tempdir().unwrap();
    let annotated = dir.path().join("wer_file.txt");
    std::fs::write(&annotated, "10|5|100\n8|8|100\n12|4|100\n").unwrap();

    let dataset = read_annotated(&annotated, '|').unwrap();
    let config = SignificanceConfig {
        total_batch: 500,
        num_samples_per_batch: 3,
        ..Default::default()
    };
    let result = compute_significance(&dataset, &config, &mut rng(3)).unwrap();
    let report = wersig::Report::new(
        ReportMeta::new(vec![annotated.display().to_string()], 3, &config),
        &dataset.summary(),
        &result,
    );

    let json: serde_json::Value =
        serde_json::from_str(&generate_json_report(&report).unwrap()).unwrap();
    assert_eq!(json["corpus"]["reference_count"], 300);
    assert_eq!(json["meta"]["seed"], 3);
    assert_eq!(json["result"]["total_batch"], 500);

    let csv = generate_csv_report(&report);
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0].split(',').count(),
        lines[1].split(',').count()
    );
}

/// Legacy two-file input produces the same dataset as the annotated file
#[test]
fn test_paired_matches_annotated() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("model_a.txt");
    let b = dir.path().join("model_b.txt");
    let annotated = dir.path().join("wer_file.txt");
    std::fs::write(&a, "10,100\n8,100\n12,100\n").unwrap();
    std::fs::write(&b, "5|100\n8|100\n4|100\n").unwrap();
    std::fs::write(&annotated, "10,5,100\n8,8,100\n12,4,100\n").unwrap();

    let paired = read_paired(&a, &b, ',', '|').unwrap();
    let single = read_annotated(&annotated, ',').unwrap();
    assert_eq!(paired.pooled(), single.pooled());
}
