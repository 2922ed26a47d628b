//! Sort validation for the streaming sweep.
//!
//! The sweep requires input sorted by (chrom, start), as produced by
//! `sort -k1,1 -k2,2n`. Validation checks that:
//! 1. All records for a chromosome are contiguous (no interleaving)
//! 2. Within a chromosome, start positions are non-decreasing
//!
//! Any consistent chromosome order is accepted.

use crate::bed::BedError;
use rustc_hash::FxHashSet;

/// Inline sort validator, fed one record at a time from the sweep loop.
#[derive(Debug, Default)]
pub struct SortValidator {
    prev_chrom: Option<String>,
    prev_start: u64,
    seen_chroms: FxHashSet<String>,
    record_count: usize,
}

impl SortValidator {
    /// Create a new sort validator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate that the given record maintains sort order.
    ///
    /// A rejected record does not advance the validator.
    #[inline]
    pub fn validate(&mut self, chrom: &str, start: u64) -> Result<(), BedError> {
        let record = self.record_count + 1;

        if self.prev_chrom.as_deref() == Some(chrom) {
            if start < self.prev_start {
                return Err(BedError::Unsorted(format!(
                    "position {} at record {} comes after {} on {}",
                    start, record, self.prev_start, chrom
                )));
            }
        } else {
            // Switching chromosomes - check we haven't seen this one before
            if self.seen_chroms.contains(chrom) {
                return Err(BedError::Unsorted(format!(
                    "chromosome '{}' at record {} was seen earlier (chromosomes must be contiguous)",
                    chrom, record
                )));
            }
            if let Some(finished) = self.prev_chrom.take() {
                self.seen_chroms.insert(finished);
            }
            self.prev_chrom = Some(chrom.to_string());
        }

        self.prev_start = start;
        self.record_count = record;
        Ok(())
    }

    /// Reset validator state for a new stream.
    pub fn reset(&mut self) {
        self.prev_chrom = None;
        self.prev_start = 0;
        self.seen_chroms.clear();
        self.record_count = 0;
    }

    /// Get the number of records validated.
    pub fn record_count(&self) -> usize {
        self.record_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_input_passes() {
        let mut v = SortValidator::new();
        assert!(v.validate("chr1", 100).is_ok());
        assert!(v.validate("chr1", 100).is_ok());
        assert!(v.validate("chr1", 200).is_ok());
        assert!(v.validate("chr2", 50).is_ok());
        assert_eq!(v.record_count(), 4);
    }

    #[test]
    fn test_position_regression_fails() {
        let mut v = SortValidator::new();
        v.validate("chr1", 200).unwrap();
        let err = v.validate("chr1", 100).unwrap_err();
        assert!(matches!(err, BedError::Unsorted(_)));
        assert!(err.to_string().contains("comes after 200"));
        // The rejected record is not counted
        assert_eq!(v.record_count(), 1);
    }

    #[test]
    fn test_chromosome_revisit_fails() {
        let mut v = SortValidator::new();
        v.validate("chr1", 100).unwrap();
        v.validate("chr2", 100).unwrap();
        assert!(matches!(v.validate("chr1", 500), Err(BedError::Unsorted(_))));
    }

    #[test]
    fn test_lower_start_on_new_chromosome_is_fine() {
        let mut v = SortValidator::new();
        v.validate("chr1", 1000).unwrap();
        assert!(v.validate("chr2", 0).is_ok());
    }

    #[test]
    fn test_reset() {
        let mut v = SortValidator::new();
        v.validate("chr1", 1000).unwrap();
        v.reset();
        assert!(v.validate("chr1", 0).is_ok());
    }
}
