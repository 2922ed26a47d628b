//! Streaming stack command: sorted BED in, labelled tiling out.
//!
//! One command covers the three projections of the sweep:
//! - `Names`: `chrom start end a;b;c`
//! - `Coverage`: `chrom start end depth` (bedgraph)
//! - `Stack`: `chrom start end a;b;c depth`
//!
//! # Memory Complexity
//!
//! O(k) where k = max intervals covering a single position.
//!
//! # Requirements
//!
//! Input file MUST be sorted by chromosome, then by start position.

use crate::bed::{BedError, BedReader};
use crate::config::{AbsentNamePolicy, EmitMode, MergeConfig};
use crate::merger::{IntervalSweepMerger, MergeStats};
use crate::streaming::buffers::DEFAULT_INPUT_BUFFER;
use crate::streaming::BedWriter;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Streaming stack command configuration.
#[derive(Debug, Clone, Default)]
pub struct StackCommand {
    pub config: MergeConfig,
}

impl StackCommand {
    pub fn new(mode: EmitMode) -> Self {
        Self {
            config: MergeConfig::new(mode),
        }
    }

    /// Set the policy for records without a name.
    pub fn with_absent_names(mut self, policy: AbsentNamePolicy) -> Self {
        self.config = self.config.with_absent_names(policy);
        self
    }

    /// Execute on a sorted BED file.
    pub fn run<P: AsRef<Path>, W: Write>(
        &self,
        input_path: P,
        output: &mut W,
    ) -> Result<StackStats, BedError> {
        let file = File::open(input_path.as_ref())?;
        let reader = BedReader::with_capacity(file, DEFAULT_INPUT_BUFFER);
        self.run_streaming(reader, output)
    }

    /// Execute from stdin.
    pub fn run_stdin<W: Write>(&self, output: &mut W) -> Result<StackStats, BedError> {
        let stdin = io::stdin();
        let reader = BedReader::new(stdin.lock());
        self.run_streaming(reader, output)
    }

    /// Core streaming loop: read, sweep, write.
    ///
    /// Output written before an error stays written; the error ends the run.
    pub fn run_streaming<R: io::Read, W: Write>(
        &self,
        reader: BedReader<R>,
        output: &mut W,
    ) -> Result<StackStats, BedError> {
        let mut merger = IntervalSweepMerger::new(self.config);
        let mut writer = BedWriter::new(output);
        let mut pending = Vec::new();

        log::debug!(
            "sweeping in {} mode ({:?} names for unnamed records)",
            self.config.mode,
            self.config.absent_names
        );

        for result in reader.intervals() {
            let interval = result?;
            pending.clear();
            merger.ingest_into(interval, &mut pending)?;
            for sub in &pending {
                writer.write_sub_interval(sub)?;
            }
        }

        for sub in merger.flush() {
            writer.write_sub_interval(&sub)?;
        }
        writer.flush()?;

        Ok(StackStats::from(merger.stats()))
    }
}

/// Statistics from a stack run.
#[derive(Debug, Default, Clone)]
pub struct StackStats {
    /// Number of intervals read
    pub intervals_read: usize,
    /// Zero-length intervals skipped
    pub intervals_skipped: usize,
    /// Number of sub-intervals written
    pub intervals_written: usize,
    /// Largest number of intervals covering one position
    pub max_depth: usize,
}

impl From<&MergeStats> for StackStats {
    fn from(stats: &MergeStats) -> Self {
        Self {
            intervals_read: stats.intervals_read,
            intervals_skipped: stats.intervals_skipped,
            intervals_written: stats.sub_intervals_emitted,
            max_depth: stats.max_depth,
        }
    }
}

impl StackStats {
    /// Fragmentation ratio (how many output pieces per input interval)
    pub fn fragmentation(&self) -> f64 {
        let used = self.intervals_read - self.intervals_skipped;
        if used == 0 {
            0.0
        } else {
            self.intervals_written as f64 / used as f64
        }
    }
}

impl std::fmt::Display for StackStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Read: {}, Skipped: {}, Written: {}, Fragmentation: {:.2}x, Max depth: {}",
            self.intervals_read,
            self.intervals_skipped,
            self.intervals_written,
            self.fragmentation(),
            self.max_depth
        )
    }
}
