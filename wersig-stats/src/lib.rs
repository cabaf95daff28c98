#![warn(missing_docs)]
//! WerSig Statistical Engine
//!
//! Decides whether the word (or character) error rate of model B differs
//! significantly from that of model A on a shared evaluation set:
//! - Ratio-of-sums error-rate change over arbitrary record subsets
//! - Bootstrap resampling, pooled or stratified by block (e.g. speaker)
//! - Bessel-corrected bootstrap standard error
//! - Percentile and gaussian confidence intervals
//! - Reproducible results from an explicit, caller-seeded generator

mod bootstrap;
mod dataset;
mod dispersion;
mod error;
mod interval;
mod metric;
mod percentiles;
mod significance;

pub use bootstrap::{
    BootstrapDistribution, ResamplingConfig, ResamplingEngine, SamplingMode, counter_rng_seed,
};
pub use dataset::{CorpusSummary, DEFAULT_BLOCK, Dataset, ModelCounts, Record};
pub use dispersion::{mean, standard_error};
pub use error::{ComputeError, ConfigError, DatasetError, SignificanceError};
pub use interval::{
    ConfidenceInterval, IntervalMethod, Z_SCORES, alpha, gaussian_interval, percentile_interval,
    validate_confidence_level, z_score,
};
pub use metric::{WerChange, wer_change};
pub use percentiles::{compute_percentile, percentile_of_sorted};
pub use significance::{
    SignificanceConfig, SignificanceResult, SignificanceTest, Verdict, compute_significance,
};

/// Default number of bootstrap batches
pub const DEFAULT_TOTAL_BATCH: usize = 1_000;

/// Default number of records drawn per batch
pub const DEFAULT_SAMPLES_PER_BATCH: usize = 1_000;

/// Default confidence level (95%)
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;
