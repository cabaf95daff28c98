//! Evaluation Dataset
//!
//! Paired per-item error counts for two models, optionally partitioned into
//! named blocks (e.g. speakers). Blocks are kept in a `BTreeMap` so that
//! block iteration order, and therefore stratified resampling, is
//! reproducible.

use crate::error::{ComputeError, DatasetError};
use std::collections::BTreeMap;

/// Block id used when the input carries no block column
pub const DEFAULT_BLOCK: &str = "all";

/// Edit distance of both models on one evaluation item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    /// Edit operations made by model A
    pub errors_a: u32,
    /// Edit operations made by model B
    pub errors_b: u32,
    /// Reference length (words or characters)
    pub reference_count: u32,
}

impl Record {
    /// Create a record from both models' errors and the shared reference length
    pub fn new(errors_a: u32, errors_b: u32, reference_count: u32) -> Self {
        Self {
            errors_a,
            errors_b,
            reference_count,
        }
    }

    /// `errors_b - errors_a` for this item
    pub fn delta(&self) -> i64 {
        i64::from(self.errors_b) - i64::from(self.errors_a)
    }
}

/// Output of a single model on one item, as found in the legacy per-model files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelCounts {
    /// Edit distance against the reference
    pub edit_distance: u32,
    /// Reference length
    pub reference_count: u32,
}

/// Corpus-level figures for both models
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorpusSummary {
    /// Number of records
    pub items: usize,
    /// Number of blocks
    pub blocks: usize,
    /// Total reference length
    pub reference_count: u64,
    /// Total edit operations of model A
    pub errors_a: u64,
    /// Total edit operations of model B
    pub errors_b: u64,
    /// Corpus error rate of model A (`None` when the reference total is zero)
    pub error_rate_a: Option<f64>,
    /// Corpus error rate of model B
    pub error_rate_b: Option<f64>,
}

/// Read-only collection of records grouped by block
#[derive(Debug, Clone)]
pub struct Dataset {
    blocks: BTreeMap<String, Vec<Record>>,
    pooled: Vec<Record>,
}

impl Dataset {
    /// Dataset with every record in the implicit default block
    pub fn single_block(records: Vec<Record>) -> Result<Self, DatasetError> {
        if records.is_empty() {
            return Err(DatasetError::Empty);
        }
        let mut blocks = BTreeMap::new();
        blocks.insert(DEFAULT_BLOCK.to_string(), records);
        Self::from_blocks(blocks)
    }

    /// Dataset from pre-grouped blocks. Every block must be non-empty.
    pub fn from_blocks(blocks: BTreeMap<String, Vec<Record>>) -> Result<Self, DatasetError> {
        if blocks.is_empty() {
            return Err(DatasetError::Empty);
        }
        if let Some((name, _)) = blocks.iter().find(|(_, records)| records.is_empty()) {
            return Err(DatasetError::EmptyBlock(name.clone()));
        }

        let pooled = blocks.values().flatten().copied().collect();
        Ok(Self { blocks, pooled })
    }

    /// Dataset from `(block, record)` pairs in input order.
    ///
    /// Records without a block id land in [`DEFAULT_BLOCK`].
    pub fn from_tagged<I, S>(records: I) -> Result<Self, DatasetError>
    where
        I: IntoIterator<Item = (Option<S>, Record)>,
        S: Into<String>,
    {
        let mut blocks: BTreeMap<String, Vec<Record>> = BTreeMap::new();
        for (block, record) in records {
            let key = block.map_or_else(|| DEFAULT_BLOCK.to_string(), Into::into);
            blocks.entry(key).or_default().push(record);
        }
        Self::from_blocks(blocks)
    }

    /// Merge two per-model item lists by position.
    ///
    /// Item `i` of `model_a` and `model_b` must describe the same reference,
    /// so their reference counts have to agree.
    pub fn merge_paired(model_a: &[ModelCounts], model_b: &[ModelCounts]) -> Result<Self, DatasetError> {
        if model_a.len() != model_b.len() {
            return Err(DatasetError::LengthMismatch {
                a: model_a.len(),
                b: model_b.len(),
            });
        }

        let records = model_a
            .iter()
            .zip(model_b)
            .enumerate()
            .map(|(item, (a, b))| {
                if a.reference_count != b.reference_count {
                    return Err(DatasetError::ReferenceMismatch {
                        item,
                        a: a.reference_count,
                        b: b.reference_count,
                    });
                }
                Ok(Record::new(a.edit_distance, b.edit_distance, a.reference_count))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::single_block(records)
    }

    /// Blocks in id order
    pub fn blocks(&self) -> impl Iterator<Item = (&str, &[Record])> {
        self.blocks
            .iter()
            .map(|(name, records)| (name.as_str(), records.as_slice()))
    }

    /// Records of a single block
    pub fn block(&self, name: &str) -> Option<&[Record]> {
        self.blocks.get(name).map(Vec::as_slice)
    }

    /// Number of blocks
    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// All records, blocks concatenated in id order
    pub fn pooled(&self) -> &[Record] {
        &self.pooled
    }

    /// Number of records across all blocks
    pub fn len(&self) -> usize {
        self.pooled.len()
    }

    /// Always false for a constructed dataset
    pub fn is_empty(&self) -> bool {
        self.pooled.is_empty()
    }

    /// Reject records whose reference count is zero.
    ///
    /// Such records can make a resampled batch's denominator vanish, so the
    /// engine refuses the whole population up front.
    pub fn check_reference_counts(&self) -> Result<(), ComputeError> {
        for (block, records) in &self.blocks {
            if let Some(index) = records.iter().position(|r| r.reference_count == 0) {
                return Err(ComputeError::ZeroReferenceCount {
                    block: block.clone(),
                    index,
                });
            }
        }
        Ok(())
    }

    /// Corpus totals and per-model error rates
    pub fn summary(&self) -> CorpusSummary {
        let (errors_a, errors_b, reference_count) =
            self.pooled.iter().fold((0u64, 0u64, 0u64), |(a, b, n), r| {
                (
                    a + u64::from(r.errors_a),
                    b + u64::from(r.errors_b),
                    n + u64::from(r.reference_count),
                )
            });

        let rate = |errors: u64| (reference_count > 0).then(|| errors as f64 / reference_count as f64);

        CorpusSummary {
            items: self.pooled.len(),
            blocks: self.blocks.len(),
            reference_count,
            errors_a,
            errors_b,
            error_rate_a: rate(errors_a),
            error_rate_b: rate(errors_b),
        }
    }
}
