#![warn(missing_docs)]
//! # WerSig
//!
//! Is model B's word error rate really lower than model A's, or is the
//! difference noise? WerSig answers with a bootstrap test on paired
//! per-utterance error counts:
//! - **Corpus-level metric**: the change is a ratio of sums, not a mean of per-item rates
//! - **Block stratification**: resample within speakers (or any grouping) when items are correlated
//! - **Two interval methods**: empirical percentiles or a gaussian approximation
//! - **Reproducible**: every run is driven by an explicit seed, serial or parallel
//!
//! ## Quick Start
//!
//! ```
//! use rand::SeedableRng;
//! use rand_xoshiro::Xoshiro256PlusPlus;
//! use wersig::{Dataset, Record, SignificanceConfig, compute_significance};
//!
//! let dataset = Dataset::single_block(vec![
//!     Record::new(10, 5, 100),
//!     Record::new(8, 8, 100),
//!     Record::new(12, 4, 100),
//! ])?;
//! let config = SignificanceConfig {
//!     total_batch: 1_000,
//!     num_samples_per_batch: 3,
//!     ..Default::default()
//! };
//! let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
//! let result = compute_significance(&dataset, &config, &mut rng)?;
//! assert!(result.ci_low() <= result.ci_high());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export the statistical engine
pub use wersig_stats::{
    BootstrapDistribution, ComputeError, ConfidenceInterval, ConfigError, CorpusSummary,
    DEFAULT_BLOCK, DEFAULT_CONFIDENCE_LEVEL, DEFAULT_SAMPLES_PER_BATCH, DEFAULT_TOTAL_BATCH,
    Dataset, DatasetError, IntervalMethod, ModelCounts, Record, ResamplingConfig,
    ResamplingEngine, SamplingMode, SignificanceConfig, SignificanceError, SignificanceResult,
    SignificanceTest, Verdict, compute_significance, wer_change,
};

// Re-export reports
pub use wersig_report::{OutputFormat, Report, ReportMeta, generate_csv_report, generate_json_report};

// Re-export readers and configuration
pub use wersig_cli::{InputError, WersigConfig, read_annotated, read_paired};

/// Run the WerSig CLI.
///
/// The `wersig` binary is a thin wrapper around this:
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     wersig::run()
/// }
/// ```
pub use wersig_cli::run;
