//! Report Data Structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wersig_stats::{CorpusSummary, SignificanceConfig, SignificanceResult};

/// Current JSON schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier embedded in every report
pub const SCHEMA_ID: &str = "wersig-report";

/// Schema information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSchema {
    /// Schema identifier
    pub schema: String,
    /// Schema version
    pub version: u32,
}

impl Default for ReportSchema {
    fn default() -> Self {
        Self {
            schema: SCHEMA_ID.to_string(),
            version: SCHEMA_VERSION,
        }
    }
}

/// Complete significance report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Provenance of the run
    pub meta: ReportMeta,
    /// Corpus totals for both models
    pub corpus: CorpusReport,
    /// Bootstrap outcome
    pub result: SignificanceReport,
}

impl Report {
    /// Assemble a report from the engine's outputs
    pub fn new(meta: ReportMeta, corpus: &CorpusSummary, result: &SignificanceResult) -> Self {
        Self {
            meta,
            corpus: CorpusReport::from(corpus),
            result: SignificanceReport::from(result),
        }
    }
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Report schema id and version
    pub schema: ReportSchema,
    /// Version of the tool that wrote the report
    pub version: String,
    /// Generation time (UTC)
    pub timestamp: DateTime<Utc>,
    /// Input files, in the order they were read
    pub inputs: Vec<String>,
    /// Seed of the caller generator; replaying it reproduces the result
    pub seed: u64,
    /// Effective test configuration
    pub config: ReportConfig,
}

impl ReportMeta {
    /// Metadata stamped with the current time
    pub fn new(inputs: Vec<String>, seed: u64, config: &SignificanceConfig) -> Self {
        Self {
            schema: ReportSchema::default(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            inputs,
            seed,
            config: ReportConfig::from(config),
        }
    }
}

/// Test configuration captured in report metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Requested number of bootstrap batches
    pub total_batch: usize,
    /// Requested records per batch, before stratification
    pub samples_per_batch: usize,
    /// Confidence level
    pub confidence_level: f64,
    /// Interval method name
    pub method: String,
    /// Sampling mode name
    pub sampling: String,
    /// Whether trials ran on the thread pool
    pub parallel: bool,
}

impl From<&SignificanceConfig> for ReportConfig {
    fn from(config: &SignificanceConfig) -> Self {
        Self {
            total_batch: config.total_batch,
            samples_per_batch: config.num_samples_per_batch,
            confidence_level: config.confidence_level,
            method: config.method.to_string(),
            sampling: config.sampling.to_string(),
            parallel: config.parallel,
        }
    }
}

/// Corpus-level error rates of both models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusReport {
    /// Number of records
    pub items: usize,
    /// Number of blocks
    pub blocks: usize,
    /// Total reference length
    pub reference_count: u64,
    /// Total errors of model A
    pub errors_a: u64,
    /// Total errors of model B
    pub errors_b: u64,
    /// Corpus error rate of model A
    pub error_rate_a: Option<f64>,
    /// Corpus error rate of model B
    pub error_rate_b: Option<f64>,
}

impl From<&CorpusSummary> for CorpusReport {
    fn from(summary: &CorpusSummary) -> Self {
        Self {
            items: summary.items,
            blocks: summary.blocks,
            reference_count: summary.reference_count,
            errors_a: summary.errors_a,
            errors_b: summary.errors_b,
            error_rate_a: summary.error_rate_a,
            error_rate_b: summary.error_rate_b,
        }
    }
}

/// Bootstrap estimate, interval and verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignificanceReport {
    /// Mean of the bootstrap distribution
    pub point_estimate: f64,
    /// Change over the unsampled dataset (pooled sampling only)
    pub absolute_difference: Option<f64>,
    /// Lower confidence bound
    pub ci_low: f64,
    /// Upper confidence bound
    pub ci_high: f64,
    /// Confidence level
    pub confidence_level: f64,
    /// Bootstrap standard error
    pub std_err: f64,
    /// Interval method name
    pub method: String,
    /// Sampling mode name
    pub sampling: String,
    /// Bootstrap batches run
    pub total_batch: usize,
    /// Records drawn per batch after stratification
    pub samples_per_batch: usize,
    /// Model B significantly better than model A
    pub significant: bool,
    /// "improvement", "regression" or "inconclusive"
    pub verdict: String,
}

impl From<&SignificanceResult> for SignificanceReport {
    fn from(result: &SignificanceResult) -> Self {
        Self {
            point_estimate: result.point_estimate(),
            absolute_difference: result.absolute_difference(),
            ci_low: result.ci_low(),
            ci_high: result.ci_high(),
            confidence_level: result.confidence_level(),
            std_err: result.std_err(),
            method: result.method().to_string(),
            sampling: result.sampling().to_string(),
            total_batch: result.total_batch(),
            samples_per_batch: result.samples_per_batch(),
            significant: result.is_significant(),
            verdict: result.verdict().to_string(),
        }
    }
}
