//! Bootstrap Resampling
//!
//! Builds the empirical distribution of the error-rate change by drawing
//! batches of records with replacement, either from the pooled dataset or
//! independently within each block.
//!
//! Randomness comes from a caller-supplied generator. It is consulted once
//! for a base seed; trial `i` then draws from its own `Xoshiro256PlusPlus`
//! stream seeded with `counter_rng_seed(base, i)`, so serial and parallel
//! runs produce the same distribution.

use crate::dataset::{Dataset, Record};
use crate::dispersion::{mean, standard_error};
use crate::error::{ConfigError, SignificanceError};
use crate::metric::WerChange;
use crate::percentiles::percentile_of_sorted;
use rand::{Rng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;

/// How records are drawn for each bootstrap batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplingMode {
    /// Draw uniformly from all records, blocks concatenated
    #[default]
    Pooled,
    /// Draw the same number of records from every block
    BlockStratified,
}

impl std::fmt::Display for SamplingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SamplingMode::Pooled => write!(f, "pooled"),
            SamplingMode::BlockStratified => write!(f, "block-stratified"),
        }
    }
}

/// Resampling parameters
#[derive(Debug, Clone)]
pub struct ResamplingConfig {
    /// Number of bootstrap batches (trials)
    pub total_batch: usize,
    /// Records drawn per batch; split evenly across blocks when stratified
    pub num_samples_per_batch: usize,
    /// Pooled or block-stratified draws
    pub mode: SamplingMode,
    /// Run trials on the rayon pool
    pub parallel: bool,
}

impl ResamplingConfig {
    /// Records drawn per batch after stratification.
    ///
    /// In stratified mode each block contributes
    /// `num_samples_per_batch / blocks` records; a zero quotient is rejected.
    pub fn effective_samples(&self, num_blocks: usize) -> Result<usize, ConfigError> {
        if self.num_samples_per_batch == 0 {
            return Err(ConfigError::ZeroSamplesPerBatch);
        }
        match self.mode {
            SamplingMode::Pooled => Ok(self.num_samples_per_batch),
            SamplingMode::BlockStratified => {
                let per_block = self.num_samples_per_batch / num_blocks.max(1);
                if per_block == 0 {
                    return Err(ConfigError::BlocksExceedBatch {
                        blocks: num_blocks,
                        samples_per_batch: self.num_samples_per_batch,
                    });
                }
                Ok(per_block * num_blocks)
            }
        }
    }
}

/// Metric values of every bootstrap batch, in trial order
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapDistribution {
    samples: Vec<f64>,
    sorted: Vec<f64>,
}

impl BootstrapDistribution {
    /// Wrap per-trial metric values, keeping a sorted copy for percentiles
    pub fn new(samples: Vec<f64>) -> Self {
        let mut sorted = samples.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        Self { samples, sorted }
    }

    /// Samples in trial order
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Samples in ascending order
    pub fn sorted(&self) -> &[f64] {
        &self.sorted
    }

    /// Number of trials
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when no trials were run
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Bootstrap point estimate
    pub fn mean(&self) -> f64 {
        mean(&self.samples)
    }

    /// Bessel-corrected standard deviation of the samples
    pub fn standard_error(&self) -> f64 {
        standard_error(&self.samples, self.mean())
    }

    /// Percentile in `[0, 100]`, linearly interpolated
    pub fn percentile(&self, percentile: f64) -> f64 {
        percentile_of_sorted(&self.sorted, percentile)
    }
}

/// Draws bootstrap batches from a dataset
#[derive(Debug, Clone)]
pub struct ResamplingEngine {
    config: ResamplingConfig,
}

impl ResamplingEngine {
    /// Create an engine; needs at least two batches and a positive batch size
    pub fn new(config: ResamplingConfig) -> Result<Self, ConfigError> {
        if config.total_batch < 2 {
            return Err(ConfigError::TooFewBatches {
                got: config.total_batch,
                min: 2,
            });
        }
        if config.num_samples_per_batch == 0 {
            return Err(ConfigError::ZeroSamplesPerBatch);
        }
        Ok(Self { config })
    }

    /// Resampling parameters
    pub fn config(&self) -> &ResamplingConfig {
        &self.config
    }

    /// Resample `dataset` `total_batch` times and evaluate the metric on each batch
    pub fn distribution<R: RngCore + ?Sized>(
        &self,
        dataset: &Dataset,
        rng: &mut R,
    ) -> Result<BootstrapDistribution, SignificanceError> {
        let num_blocks = dataset.num_blocks();
        let effective = self.config.effective_samples(num_blocks)?;
        dataset.check_reference_counts()?;

        let per_block = effective / num_blocks;
        let blocks: Vec<&[Record]> = dataset.blocks().map(|(_, records)| records).collect();
        let base_seed = rng.next_u64();

        let trial = |i: usize| {
            let mut trial_rng =
                Xoshiro256PlusPlus::seed_from_u64(counter_rng_seed(base_seed, i as u64));
            let batch = match self.config.mode {
                SamplingMode::Pooled => sample_batch(
                    dataset.pooled(),
                    self.config.num_samples_per_batch,
                    &mut trial_rng,
                ),
                SamplingMode::BlockStratified => {
                    sample_stratified(&blocks, per_block, &mut trial_rng)
                }
            };
            batch.ratio()
        };

        let samples = if self.config.parallel {
            (0..self.config.total_batch)
                .into_par_iter()
                .map(trial)
                .collect::<Result<Vec<_>, _>>()?
        } else {
            (0..self.config.total_batch)
                .map(trial)
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(BootstrapDistribution::new(samples))
    }
}

/// Draw `n` records with replacement from `pool`
fn sample_batch<R: Rng + ?Sized>(pool: &[Record], n: usize, rng: &mut R) -> WerChange {
    let mut acc = WerChange::new();
    for _ in 0..n {
        acc.push(&pool[rng.gen_range(0..pool.len())]);
    }
    acc
}

/// Draw `per_block` records with replacement from each block and combine them
fn sample_stratified<R: Rng + ?Sized>(
    blocks: &[&[Record]],
    per_block: usize,
    rng: &mut R,
) -> WerChange {
    let mut acc = WerChange::new();
    for block in blocks {
        for _ in 0..per_block {
            acc.push(&block[rng.gen_range(0..block.len())]);
        }
    }
    acc
}

/// Seed for trial `counter` derived from `seed` (SplitMix64 finalizer)
pub fn counter_rng_seed(seed: u64, counter: u64) -> u64 {
    let mut z = seed.wrapping_add(
        counter
            .wrapping_add(1)
            .wrapping_mul(0x9E37_79B9_7F4A_7C15),
    );
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
