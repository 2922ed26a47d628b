//! Run configuration for the sweep merger.
//!
//! A run is configured by two choices: which columns the emitted
//! sub-intervals carry, and what happens to input records without a name.

use std::fmt;

/// Which projection of the sweep is written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmitMode {
    /// `chrom start end names`: the merged name set of every sub-interval.
    #[default]
    Names,
    /// `chrom start end score`: summed score (depth) of every sub-interval.
    Coverage,
    /// `chrom start end names score`: both of the above.
    Stack,
}

impl EmitMode {
    /// Whether sub-intervals carry the joined name set.
    #[inline]
    pub fn reports_names(self) -> bool {
        matches!(self, EmitMode::Names | EmitMode::Stack)
    }

    /// Whether sub-intervals carry the summed score.
    #[inline]
    pub fn reports_score(self) -> bool {
        matches!(self, EmitMode::Coverage | EmitMode::Stack)
    }

    /// Whether a sub-interval must end wherever the covering depth changes,
    /// not only where the name set changes.
    #[inline]
    pub fn splits_on_depth(self) -> bool {
        self.reports_score()
    }
}

impl fmt::Display for EmitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmitMode::Names => write!(f, "names"),
            EmitMode::Coverage => write!(f, "coverage"),
            EmitMode::Stack => write!(f, "stack"),
        }
    }
}

/// Treatment of input records that carry no feature name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AbsentNamePolicy {
    /// Give every unnamed record its own synthetic name (`chrom:start-end#n`).
    ///
    /// Synthetic names are tracked apart from input names; only the printed
    /// label can coincide with a real name of the same text.
    #[default]
    Synthetic,
    /// Count unnamed records toward coverage only; they never appear in a name set.
    Anonymous,
}

/// Merger configuration.
///
/// # Example
///
/// ```
/// use bedstack::config::{AbsentNamePolicy, EmitMode, MergeConfig};
///
/// let config = MergeConfig::new(EmitMode::Coverage)
///     .with_absent_names(AbsentNamePolicy::Anonymous);
/// assert!(config.mode.reports_score());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeConfig {
    pub mode: EmitMode,
    pub absent_names: AbsentNamePolicy,
}

impl MergeConfig {
    pub fn new(mode: EmitMode) -> Self {
        Self {
            mode,
            absent_names: AbsentNamePolicy::default(),
        }
    }

    /// Set the policy for unnamed records.
    pub fn with_absent_names(mut self, policy: AbsentNamePolicy) -> Self {
        self.absent_names = policy;
        self
    }
}
