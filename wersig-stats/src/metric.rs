//! Error-Rate Change Metric
//!
//! The statistic under test is a ratio of sums over a set of records:
//!
//! ```text
//! Σ (errors_b - errors_a) / Σ reference_count
//! ```
//!
//! It is the corpus-level WER (or CER) of model B minus that of model A,
//! not an average of per-item rates.

use crate::dataset::Record;
use crate::error::ComputeError;

/// Running sums for the error-rate change of a batch of records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WerChange {
    delta: i64,
    reference: u64,
}

impl WerChange {
    /// Empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one record to the batch
    #[inline]
    pub fn push(&mut self, record: &Record) {
        self.delta += record.delta();
        self.reference += u64::from(record.reference_count);
    }

    /// Sum of `errors_b - errors_a` so far
    pub fn delta(&self) -> i64 {
        self.delta
    }

    /// Sum of reference counts so far
    pub fn reference(&self) -> u64 {
        self.reference
    }

    /// The ratio of sums; fails when no reference words were accumulated
    pub fn ratio(&self) -> Result<f64, ComputeError> {
        if self.reference == 0 {
            return Err(ComputeError::ZeroReferenceTotal);
        }
        Ok(self.delta as f64 / self.reference as f64)
    }
}

impl<'a> Extend<&'a Record> for WerChange {
    fn extend<T: IntoIterator<Item = &'a Record>>(&mut self, iter: T) {
        for record in iter {
            self.push(record);
        }
    }
}

/// Error-rate change of model B relative to model A over `records`.
///
/// Negative values mean model B makes fewer errors.
pub fn wer_change(records: &[Record]) -> Result<f64, ComputeError> {
    let mut acc = WerChange::new();
    acc.extend(records);
    acc.ratio()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_of_sums() {
        let records = [
            Record::new(10, 5, 100),
            Record::new(8, 8, 100),
            Record::new(12, 4, 100),
        ];
        let change = wer_change(&records).unwrap();
        assert!((change - (-13.0 / 300.0)).abs() < 1e-15);
    }

    #[test]
    fn test_not_mean_of_ratios() {
        // Per-item ratios average to (0.5 + 0.0) / 2 = 0.25; the corpus ratio is 1/12
        let records = [Record::new(0, 1, 2), Record::new(5, 5, 10)];
        let change = wer_change(&records).unwrap();
        assert!((change - 1.0 / 12.0).abs() < 1e-15);
    }

    #[test]
    fn test_zero_reference_total() {
        let records = [Record::new(1, 2, 0)];
        assert_eq!(
            wer_change(&records).unwrap_err(),
            ComputeError::ZeroReferenceTotal
        );
        assert_eq!(wer_change(&[]).unwrap_err(), ComputeError::ZeroReferenceTotal);
    }

    #[test]
    fn test_accumulator_matches_slice() {
        let records = [Record::new(3, 1, 9), Record::new(0, 2, 4)];
        let mut acc = WerChange::new();
        for record in &records {
            acc.push(record);
        }
        assert_eq!(acc.delta(), 0);
        assert_eq!(acc.reference(), 13);
        assert_eq!(acc.ratio().unwrap(), wer_change(&records).unwrap());
    }
}
