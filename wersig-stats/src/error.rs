//! Error Types
//!
//! Every failure aborts the whole significance computation; there is no
//! partial result. Configuration and dataset errors are raised before any
//! resampling starts.

use thiserror::Error;

/// Invalid engine or request configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Level outside the open interval (0, 1)
    #[error("Invalid confidence level: {0} (must be between 0 and 1)")]
    ConfidenceOutOfRange(f64),

    /// Gaussian interval requested at a level without a tabulated z-score
    #[error("Confidence level {0} is not supported by the gaussian approximation (use 0.90, 0.95 or 0.99)")]
    UnsupportedGaussianLevel(f64),

    /// `num_samples_per_batch` is zero
    #[error("Number of samples per batch must be positive")]
    ZeroSamplesPerBatch,

    /// Fewer batches than the standard error needs
    #[error("Not enough bootstrap batches: got {got}, need at least {min}")]
    TooFewBatches { got: usize, min: usize },

    /// Stratified batch too small to draw one record per block
    #[error("{blocks} blocks cannot share {samples_per_batch} samples per batch (at least one sample per block is required)")]
    BlocksExceedBatch {
        blocks: usize,
        samples_per_batch: usize,
    },
}

/// Numeric failure while evaluating the error-rate change
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComputeError {
    /// A record in the resampling population has no reference words
    #[error("Record {index} in block '{block}' has a zero reference count")]
    ZeroReferenceCount { block: String, index: usize },

    /// Metric evaluated over zero reference words
    #[error("Total reference count is zero; error-rate change is undefined")]
    ZeroReferenceTotal,
}

/// Dataset construction failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    /// No records at all
    #[error("Dataset contains no records")]
    Empty,

    /// A named block without records
    #[error("Block '{0}' contains no records")]
    EmptyBlock(String),

    /// Per-model inputs have different item counts
    #[error("Model outputs have different lengths: model A has {a} items, model B has {b}")]
    LengthMismatch { a: usize, b: usize },

    /// Per-model inputs disagree on an item's reference length
    #[error("Item {item}: reference count differs between models (A = {a}, B = {b})")]
    ReferenceMismatch { item: usize, a: u32, b: u32 },
}

/// Any failure of a significance computation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignificanceError {
    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Numeric failure
    #[error(transparent)]
    Compute(#[from] ComputeError),

    /// Invalid dataset
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}
