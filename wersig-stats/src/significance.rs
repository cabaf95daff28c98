//! A/B Significance Test
//!
//! Bootstraps the corpus error-rate change between model A and model B and
//! decides whether model B is significantly better.

use crate::bootstrap::{BootstrapDistribution, ResamplingConfig, ResamplingEngine, SamplingMode};
use crate::dataset::Dataset;
use crate::error::{ConfigError, SignificanceError};
use crate::interval::{
    ConfidenceInterval, IntervalMethod, gaussian_interval, percentile_interval,
    validate_confidence_level, z_score,
};
use crate::metric::wer_change;
use crate::{DEFAULT_CONFIDENCE_LEVEL, DEFAULT_SAMPLES_PER_BATCH, DEFAULT_TOTAL_BATCH};
use rand::RngCore;

/// Configuration of a significance test
#[derive(Debug, Clone)]
pub struct SignificanceConfig {
    /// Number of bootstrap batches
    pub total_batch: usize,
    /// Records drawn per batch
    pub num_samples_per_batch: usize,
    /// Confidence level in (0, 1)
    pub confidence_level: f64,
    /// Interval strategy
    pub method: IntervalMethod,
    /// Pooled or block-stratified resampling
    pub sampling: SamplingMode,
    /// Run bootstrap trials in parallel
    pub parallel: bool,
}

impl Default for SignificanceConfig {
    fn default() -> Self {
        Self {
            total_batch: DEFAULT_TOTAL_BATCH,
            num_samples_per_batch: DEFAULT_SAMPLES_PER_BATCH,
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
            method: IntervalMethod::default(),
            sampling: SamplingMode::default(),
            parallel: true,
        }
    }
}

impl SignificanceConfig {
    /// Check everything that does not depend on the dataset
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_confidence_level(self.confidence_level)?;
        if self.method == IntervalMethod::Gaussian {
            z_score(self.confidence_level)?;
        }
        if self.num_samples_per_batch == 0 {
            return Err(ConfigError::ZeroSamplesPerBatch);
        }
        if self.total_batch < 2 {
            return Err(ConfigError::TooFewBatches {
                got: self.total_batch,
                min: 2,
            });
        }
        Ok(())
    }

    fn resampling(&self) -> ResamplingConfig {
        ResamplingConfig {
            total_batch: self.total_batch,
            num_samples_per_batch: self.num_samples_per_batch,
            mode: self.sampling,
            parallel: self.parallel,
        }
    }
}

/// Direction of a significant difference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Whole interval below zero: model B makes fewer errors
    Improvement,
    /// Whole interval above zero: model B makes more errors
    Regression,
    /// Interval touches or crosses zero
    Inconclusive,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Improvement => write!(f, "improvement"),
            Verdict::Regression => write!(f, "regression"),
            Verdict::Inconclusive => write!(f, "inconclusive"),
        }
    }
}

/// Outcome of a significance test
#[derive(Debug, Clone, PartialEq)]
pub struct SignificanceResult {
    point_estimate: f64,
    absolute_difference: Option<f64>,
    confidence_interval: ConfidenceInterval,
    std_err: f64,
    method: IntervalMethod,
    sampling: SamplingMode,
    total_batch: usize,
    samples_per_batch: usize,
}

impl SignificanceResult {
    /// Mean of the bootstrap distribution
    pub fn point_estimate(&self) -> f64 {
        self.point_estimate
    }

    /// Error-rate change over the whole, unsampled dataset (pooled mode only)
    pub fn absolute_difference(&self) -> Option<f64> {
        self.absolute_difference
    }

    /// Lower confidence bound
    pub fn ci_low(&self) -> f64 {
        self.confidence_interval.lower
    }

    /// Upper confidence bound
    pub fn ci_high(&self) -> f64 {
        self.confidence_interval.upper
    }

    /// Both bounds with their level
    pub fn confidence_interval(&self) -> ConfidenceInterval {
        self.confidence_interval
    }

    /// Requested confidence level
    pub fn confidence_level(&self) -> f64 {
        self.confidence_interval.level
    }

    /// Bootstrap standard error
    pub fn std_err(&self) -> f64 {
        self.std_err
    }

    /// Interval strategy used
    pub fn method(&self) -> IntervalMethod {
        self.method
    }

    /// Resampling mode used
    pub fn sampling(&self) -> SamplingMode {
        self.sampling
    }

    /// Number of bootstrap batches
    pub fn total_batch(&self) -> usize {
        self.total_batch
    }

    /// Records actually drawn per batch (after per-block truncation)
    pub fn samples_per_batch(&self) -> usize {
        self.samples_per_batch
    }

    /// True iff both bounds are strictly negative, i.e. model B is better.
    ///
    /// One-directional: a significant regression of model B is not reported
    /// here, see [`SignificanceResult::verdict`].
    pub fn is_significant(&self) -> bool {
        self.ci_low() < 0.0 && self.ci_high() < 0.0
    }

    /// Two-sided reading of the interval
    pub fn verdict(&self) -> Verdict {
        if self.is_significant() {
            Verdict::Improvement
        } else if self.ci_low() > 0.0 && self.ci_high() > 0.0 {
            Verdict::Regression
        } else {
            Verdict::Inconclusive
        }
    }
}

/// Bootstrap significance test with a fixed configuration
#[derive(Debug, Clone)]
pub struct SignificanceTest {
    config: SignificanceConfig,
    engine: ResamplingEngine,
}

impl SignificanceTest {
    /// Validate `config` and build the test
    pub fn new(config: SignificanceConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let engine = ResamplingEngine::new(config.resampling())?;
        Ok(Self { config, engine })
    }

    /// Validated configuration
    pub fn config(&self) -> &SignificanceConfig {
        &self.config
    }

    /// Generate the bootstrap distribution for `dataset`
    pub fn distribution<R: RngCore + ?Sized>(
        &self,
        dataset: &Dataset,
        rng: &mut R,
    ) -> Result<BootstrapDistribution, SignificanceError> {
        self.engine.distribution(dataset, rng)
    }

    /// Derive the result from a distribution produced by [`Self::distribution`]
    pub fn summarize(
        &self,
        dataset: &Dataset,
        distribution: &BootstrapDistribution,
    ) -> Result<SignificanceResult, SignificanceError> {
        let point_estimate = distribution.mean();
        let std_err = distribution.standard_error();
        let level = self.config.confidence_level;

        let confidence_interval = match self.config.method {
            IntervalMethod::Percentile => percentile_interval(distribution, level),
            IntervalMethod::Gaussian => gaussian_interval(point_estimate, std_err, level)?,
        };
        debug_assert!(confidence_interval.lower <= confidence_interval.upper);

        let absolute_difference = match self.config.sampling {
            SamplingMode::Pooled => Some(wer_change(dataset.pooled())?),
            SamplingMode::BlockStratified => None,
        };

        Ok(SignificanceResult {
            point_estimate,
            absolute_difference,
            confidence_interval,
            std_err,
            method: self.config.method,
            sampling: self.config.sampling,
            total_batch: distribution.len(),
            samples_per_batch: self
                .engine
                .config()
                .effective_samples(dataset.num_blocks())?,
        })
    }

    /// Resample `dataset` and compute the significance result
    pub fn run<R: RngCore + ?Sized>(
        &self,
        dataset: &Dataset,
        rng: &mut R,
    ) -> Result<SignificanceResult, SignificanceError> {
        let distribution = self.distribution(dataset, rng)?;
        self.summarize(dataset, &distribution)
    }
}

/// Compute the significance of model B's error-rate change over model A
///
/// Convenience wrapper around [`SignificanceTest`].
pub fn compute_significance<R: RngCore + ?Sized>(
    dataset: &Dataset,
    config: &SignificanceConfig,
    rng: &mut R,
) -> Result<SignificanceResult, SignificanceError> {
    SignificanceTest::new(config.clone())?.run(dataset, rng)
}
