//! Sweep-line merging of sorted intervals into a labelled tiling.
//!
//! Overlapping input intervals are cut at every boundary where the covering
//! set changes. Each emitted piece carries the names and/or the summed score
//! of everything covering it:
//!
//! ```text
//! AAAAAAAAA
//!      BBBBBBBBB
//!         CCC
//! AAAAADDDEFFBBB   D = A;B  E = A;B;C  F = B;C
//! 1---12-23-31-1   summed score (1 per interval by default)
//! ```
//!
//! # Algorithm
//!
//! For sorted input:
//! 1. Keep one merge group: the chromosome, a cursor (left edge of the next
//!    piece), the rightmost end per name, and one score contribution per
//!    absorbed interval
//! 2. If the next interval overlaps the group, emit pieces up to its start
//!    and absorb it
//! 3. If not, emit everything up to the group's end and open a new group
//!
//! # Memory Complexity
//!
//! O(k) where k = number of intervals covering the cursor.
//!
//! # Requirements
//!
//! Input MUST be sorted by chromosome, then by start position.

use crate::bed::BedError;
use crate::config::{AbsentNamePolicy, EmitMode, MergeConfig};
use crate::interval::{GenomicInterval, SubInterval};
use crate::streaming::SortValidator;
use rustc_hash::FxHashMap;
use std::fmt;

/// Rightmost extent reached under one name in the current group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveSegment {
    pub end: u64,
}

/// Identity a segment is tracked under.
///
/// Synthetic names live in their own key space, so a real name that happens
/// to spell `chrom:start-end#n` never merges with an unnamed interval.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum SegmentKey {
    Named(String),
    Synthetic { ordinal: u64, label: String },
}

impl SegmentKey {
    fn label(&self) -> &str {
        match self {
            SegmentKey::Named(name) => name,
            SegmentKey::Synthetic { label, .. } => label,
        }
    }
}

/// Decimal places kept in summed fractional scores.
const SCORE_DECIMALS: i32 = 9;

/// Score one absorbed interval adds until the cursor reaches its end.
#[derive(Debug, Clone, Copy)]
struct Contribution {
    end: u64,
    score: f64,
}

/// Working state of the sweep: a run of mutually chained overlapping intervals.
///
/// Every live segment and contribution starts at or before `cursor`, so the
/// group always covers `[cursor, end)` without gaps.
#[derive(Debug)]
pub struct MergeGroup {
    chrom: String,
    cursor: u64,
    end: u64,
    segments: FxHashMap<SegmentKey, ActiveSegment>,
    contributions: Vec<Contribution>,
    /// Rightmost end of intervals that count toward coverage but carry no name.
    anonymous_end: Option<u64>,
}

impl MergeGroup {
    fn open(interval: &GenomicInterval, names: Option<Vec<SegmentKey>>) -> Self {
        let mut group = Self {
            chrom: interval.chrom.clone(),
            cursor: interval.start,
            end: interval.start,
            segments: FxHashMap::default(),
            contributions: Vec::with_capacity(16),
            anonymous_end: None,
        };
        group.absorb(interval.end, interval.score, names);
        group
    }

    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    /// Left edge of the next sub-interval to be emitted.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Rightmost end over everything absorbed so far.
    pub fn end(&self) -> u64 {
        self.end
    }

    /// The live segment for a name read from the input, if the name is still open.
    pub fn segment(&self, name: &str) -> Option<&ActiveSegment> {
        self.segments
            .iter()
            .find(|(key, _)| matches!(key, SegmentKey::Named(n) if n.as_str() == name))
            .map(|(_, segment)| segment)
    }

    /// Number of names currently open.
    pub fn open_names(&self) -> usize {
        self.segments.len()
    }

    /// Number of input intervals covering the cursor.
    pub fn depth(&self) -> usize {
        self.contributions.len()
    }

    #[inline]
    fn overlaps(&self, interval: &GenomicInterval) -> bool {
        self.chrom == interval.chrom && interval.start < self.end && interval.end > self.cursor
    }

    fn absorb(&mut self, end: u64, score: f64, names: Option<Vec<SegmentKey>>) {
        match names {
            Some(names) => {
                for name in names {
                    self.segments
                        .entry(name)
                        .and_modify(|s| s.end = s.end.max(end))
                        .or_insert(ActiveSegment { end });
                }
            }
            None => {
                self.anonymous_end = Some(self.anonymous_end.map_or(end, |e| e.max(end)));
            }
        }
        self.contributions.push(Contribution { end, score });
        self.end = self.end.max(end);
    }

    /// Nearest position past the cursor where the emitted columns may change.
    fn next_boundary(&self, mode: EmitMode) -> Option<u64> {
        if mode.splits_on_depth() {
            self.contributions.iter().map(|c| c.end).min()
        } else {
            self.segments
                .values()
                .map(|s| s.end)
                .min()
                .or(self.anonymous_end)
        }
    }

    /// Emit sub-intervals from the cursor up to `to`, dropping whatever ends on the way.
    fn shift(&mut self, to: u64, mode: EmitMode, out: &mut Vec<SubInterval>) {
        while self.cursor < to {
            let Some(boundary) = self.next_boundary(mode) else {
                break;
            };
            let next = boundary.min(to);
            out.push(self.snapshot(next, mode));
            self.cursor = next;
            self.release();
        }
    }

    fn finish(&mut self, mode: EmitMode, out: &mut Vec<SubInterval>) {
        self.shift(self.end, mode, out);
    }

    fn snapshot(&self, end: u64, mode: EmitMode) -> SubInterval {
        SubInterval {
            chrom: self.chrom.clone(),
            start: self.cursor,
            end,
            label: mode.reports_names().then(|| self.label()),
            score: mode.reports_score().then(|| self.summed_score()),
        }
    }

    /// Sum of live contributions, rounded to [`SCORE_DECIMALS`] places so
    /// float accumulation error (`0.1 + 0.2`) does not reach the output.
    fn summed_score(&self) -> f64 {
        let sum: f64 = self.contributions.iter().map(|c| c.score).sum();
        if sum.fract() == 0.0 || sum.abs() >= 1e6 {
            return sum;
        }
        let scale = 10f64.powi(SCORE_DECIMALS);
        (sum * scale).round() / scale
    }

    fn label(&self) -> String {
        if self.segments.is_empty() {
            return ".".to_string();
        }
        let mut names: Vec<&str> = self.segments.keys().map(SegmentKey::label).collect();
        names.sort_unstable();
        names.dedup();
        names.join(";")
    }

    fn release(&mut self) {
        let cursor = self.cursor;
        self.segments.retain(|_, s| s.end > cursor);
        self.contributions.retain(|c| c.end > cursor);
        if self.anonymous_end.is_some_and(|e| e <= cursor) {
            self.anonymous_end = None;
        }
    }
}

/// Single-pass merger over a sorted interval stream.
///
/// Feed intervals with [`ingest`](Self::ingest) and call
/// [`flush`](Self::flush) at end of stream. Sub-intervals come out in
/// left-to-right order as soon as no later input can change them.
///
/// # Example
///
/// ```
/// use bedstack::config::{EmitMode, MergeConfig};
/// use bedstack::interval::GenomicInterval;
/// use bedstack::merger::IntervalSweepMerger;
///
/// let mut merger = IntervalSweepMerger::new(MergeConfig::new(EmitMode::Names));
/// let mut out = merger.ingest(GenomicInterval::new("chr1", 0, 10).with_names(["A"])).unwrap();
/// out.extend(merger.ingest(GenomicInterval::new("chr1", 5, 15).with_names(["B"])).unwrap());
/// out.extend(merger.flush());
///
/// let lines: Vec<String> = out.iter().map(|s| s.to_string()).collect();
/// assert_eq!(lines, ["chr1\t0\t5\tA", "chr1\t5\t10\tA;B", "chr1\t10\t15\tB"]);
/// ```
#[derive(Debug)]
pub struct IntervalSweepMerger {
    config: MergeConfig,
    group: Option<MergeGroup>,
    validator: SortValidator,
    /// Position of the current interval among the non-empty ones, used for synthetic names.
    ordinal: u64,
    stats: MergeStats,
}

impl Default for IntervalSweepMerger {
    fn default() -> Self {
        Self::new(MergeConfig::default())
    }
}

impl IntervalSweepMerger {
    pub fn new(config: MergeConfig) -> Self {
        Self {
            config,
            group: None,
            validator: SortValidator::new(),
            ordinal: 0,
            stats: MergeStats::default(),
        }
    }

    pub fn config(&self) -> MergeConfig {
        self.config
    }

    pub fn stats(&self) -> &MergeStats {
        &self.stats
    }

    /// The group currently being swept, if any.
    pub fn group(&self) -> Option<&MergeGroup> {
        self.group.as_ref()
    }

    /// Absorb one interval, returning the sub-intervals it finalized.
    pub fn ingest(&mut self, interval: GenomicInterval) -> Result<Vec<SubInterval>, BedError> {
        let mut out = Vec::new();
        self.ingest_into(interval, &mut out)?;
        Ok(out)
    }

    /// Absorb one interval, appending finalized sub-intervals to `out`.
    ///
    /// On error nothing is appended and the merger state, stats included,
    /// is unchanged.
    pub fn ingest_into(
        &mut self,
        mut interval: GenomicInterval,
        out: &mut Vec<SubInterval>,
    ) -> Result<(), BedError> {
        if interval.start > interval.end {
            log::error!("coordinate error: {}", interval);
            return Err(BedError::Coordinate {
                start: interval.start,
                end: interval.end,
                record: interval.to_string(),
            });
        }
        if interval.is_empty() {
            self.stats.intervals_read += 1;
            self.stats.intervals_skipped += 1;
            return Ok(());
        }
        self.validator.validate(&interval.chrom, interval.start)?;
        self.stats.intervals_read += 1;
        self.ordinal += 1;

        let names = self.resolve_names(&mut interval);
        let mode = self.config.mode;
        let emitted_before = out.len();

        let overlaps = self
            .group
            .as_ref()
            .is_some_and(|group| group.overlaps(&interval));

        if overlaps {
            if let Some(group) = self.group.as_mut() {
                group.shift(interval.start, mode, out);
                group.absorb(interval.end, interval.score, names);
            }
        } else {
            if let Some(mut finished) = self.group.take() {
                finished.finish(mode, out);
                log::debug!(
                    "closed group {}:{} ({} sub-intervals emitted so far)",
                    finished.chrom,
                    finished.end,
                    self.stats.sub_intervals_emitted + out.len() - emitted_before
                );
            }
            self.group = Some(MergeGroup::open(&interval, names));
            self.stats.groups += 1;
        }

        if let Some(group) = self.group.as_ref() {
            self.stats.max_depth = self.stats.max_depth.max(group.depth());
        }
        self.record_emitted(&out[emitted_before..]);
        Ok(())
    }

    /// Emit everything still open and reset for a new stream.
    pub fn flush(&mut self) -> Vec<SubInterval> {
        let mut out = Vec::new();
        if let Some(mut group) = self.group.take() {
            group.finish(self.config.mode, &mut out);
        }
        self.record_emitted(&out);
        self.validator.reset();
        self.ordinal = 0;
        out
    }

    /// Names the interval contributes under, or None for coverage-only intervals.
    fn resolve_names(&self, interval: &mut GenomicInterval) -> Option<Vec<SegmentKey>> {
        if !interval.is_unnamed() {
            let names = std::mem::take(&mut interval.names);
            return Some(names.into_iter().map(SegmentKey::Named).collect());
        }
        match self.config.absent_names {
            AbsentNamePolicy::Synthetic => Some(vec![SegmentKey::Synthetic {
                ordinal: self.ordinal,
                label: format!(
                    "{}:{}-{}#{}",
                    interval.chrom, interval.start, interval.end, self.ordinal
                ),
            }]),
            AbsentNamePolicy::Anonymous => None,
        }
    }

    fn record_emitted(&mut self, emitted: &[SubInterval]) {
        self.stats.sub_intervals_emitted += emitted.len();
        for sub in emitted {
            log::trace!("emit {}", sub);
        }
    }
}

/// Run a whole interval stream through a fresh merger.
pub fn sweep_intervals<I>(config: MergeConfig, intervals: I) -> Result<Vec<SubInterval>, BedError>
where
    I: IntoIterator<Item = GenomicInterval>,
{
    let mut merger = IntervalSweepMerger::new(config);
    let mut out = Vec::new();
    for interval in intervals {
        merger.ingest_into(interval, &mut out)?;
    }
    out.extend(merger.flush());
    Ok(out)
}

/// Counters collected over one merger run.
#[derive(Debug, Default, Clone)]
pub struct MergeStats {
    /// Number of intervals handed to the merger
    pub intervals_read: usize,
    /// Zero-length intervals dropped
    pub intervals_skipped: usize,
    /// Number of merge groups opened
    pub groups: usize,
    /// Number of sub-intervals emitted
    pub sub_intervals_emitted: usize,
    /// Largest number of intervals covering a single position
    pub max_depth: usize,
}

impl fmt::Display for MergeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Read: {}, Skipped: {}, Groups: {}, Written: {}, Max depth: {}",
            self.intervals_read,
            self.intervals_skipped,
            self.groups,
            self.sub_intervals_emitted,
            self.max_depth
        )
    }
}
