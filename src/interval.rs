//! Core record types for the sweep: the input interval and the emitted sub-interval.

use std::fmt;

/// A named, scored genomic interval.
/// Uses 0-based, half-open coordinates (BED format).
#[derive(Debug, Clone, PartialEq)]
pub struct GenomicInterval {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    /// Feature names, deduplicated and sorted. Empty when the record has no name.
    pub names: Vec<String>,
    pub score: f64,
}

impl GenomicInterval {
    /// Create an unnamed interval with the default score of 1.
    #[inline]
    pub fn new(chrom: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            chrom: chrom.into(),
            start,
            end,
            names: Vec::new(),
            score: 1.0,
        }
    }

    /// Attach feature names. Duplicates are removed and the set is sorted.
    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort_unstable();
        names.dedup();
        self.names = names;
        self
    }

    /// Set the score.
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    /// Returns the length of the interval.
    #[inline]
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the interval has zero length.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// True when the record carries no feature name.
    #[inline]
    pub fn is_unnamed(&self) -> bool {
        self.names.is_empty()
    }
}

impl fmt::Display for GenomicInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.chrom, self.start, self.end)?;
        if self.names.is_empty() {
            write!(f, "\t.")?;
        } else {
            write!(f, "\t{}", self.names.join(";"))?;
        }
        write!(f, "\t{}", self.score)
    }
}

/// One finalized piece of the tiling produced by the sweep.
///
/// `label` is set when the run reports names, `score` when it reports
/// coverage. Both are owned copies taken at emission time.
#[derive(Debug, Clone, PartialEq)]
pub struct SubInterval {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    pub label: Option<String>,
    pub score: Option<f64>,
}

impl SubInterval {
    #[inline]
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Check whether the sub-interval covers a position.
    #[inline]
    pub fn contains(&self, pos: u64) -> bool {
        self.start <= pos && pos < self.end
    }

    /// The label split back into its names. Empty for `.` or a missing label.
    pub fn names(&self) -> Vec<&str> {
        match self.label.as_deref() {
            None | Some(".") => Vec::new(),
            Some(label) => label.split(';').collect(),
        }
    }
}

impl fmt::Display for SubInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.chrom, self.start, self.end)?;
        if let Some(ref label) = self.label {
            write!(f, "\t{}", label)?;
        }
        if let Some(score) = self.score {
            if score.fract() == 0.0 && score.abs() < i64::MAX as f64 {
                write!(f, "\t{}", score as i64)?;
            } else {
                write!(f, "\t{}", score)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_names_dedups_and_sorts() {
        let iv = GenomicInterval::new("chr1", 0, 10).with_names(["b", "a", "b"]);
        assert_eq!(iv.names, vec!["a".to_string(), "b".to_string()]);
        assert!(!iv.is_unnamed());
        assert_eq!(iv.score, 1.0);
    }

    #[test]
    fn test_interval_length() {
        let iv = GenomicInterval::new("chr1", 100, 200);
        assert_eq!(iv.len(), 100);
        assert!(!iv.is_empty());
        assert!(GenomicInterval::new("chr1", 5, 5).is_empty());
    }

    #[test]
    fn test_sub_interval_display() {
        let names = SubInterval {
            chrom: "chr1".into(),
            start: 5,
            end: 10,
            label: Some("A;B".into()),
            score: None,
        };
        assert_eq!(names.to_string(), "chr1\t5\t10\tA;B");

        let coverage = SubInterval {
            chrom: "chr1".into(),
            start: 5,
            end: 10,
            label: None,
            score: Some(2.0),
        };
        assert_eq!(coverage.to_string(), "chr1\t5\t10\t2");

        let fractional = SubInterval {
            score: Some(2.5),
            ..coverage
        };
        assert_eq!(fractional.to_string(), "chr1\t5\t10\t2.5");
    }

    #[test]
    fn test_sub_interval_names() {
        let sub = SubInterval {
            chrom: "chr1".into(),
            start: 0,
            end: 1,
            label: Some(".".into()),
            score: Some(1.0),
        };
        assert!(sub.names().is_empty());
        assert!(sub.contains(0));
        assert!(!sub.contains(1));
    }
}
