//! bedstack: sweep-line merging and stacking of sorted genomic intervals.
//!
//! Overlapping intervals are cut into a gap-free, overlap-free tiling whose
//! pieces carry the names and/or the summed score of everything covering them.
//!
//! # Features
//!
//! - **Single pass**: memory bounded by the intervals covering the sweep position
//! - **One engine, three projections**: merged names, bedgraph coverage, or both
//! - **Strict input checks**: malformed, inverted, and unsorted records abort the run
//!
//! # Example
//!
//! ```rust
//! use bedstack::bed::parse_intervals;
//! use bedstack::config::{EmitMode, MergeConfig};
//! use bedstack::merger::sweep_intervals;
//!
//! let intervals = parse_intervals("chr1\t0\t10\tA\nchr1\t5\t15\tB\n").unwrap();
//! let tiling = sweep_intervals(MergeConfig::new(EmitMode::Names), intervals).unwrap();
//!
//! assert_eq!(tiling.len(), 3);
//! assert_eq!(tiling[1].label.as_deref(), Some("A;B"));
//! ```

pub mod bed;
pub mod commands;
pub mod config;
pub mod interval;
pub mod merger;
pub mod streaming;

// Re-export commonly used types
pub use bed::{parse_intervals, read_intervals, BedError, BedReader};
pub use config::{AbsentNamePolicy, EmitMode, MergeConfig};
pub use interval::{GenomicInterval, SubInterval};
pub use merger::{sweep_intervals, IntervalSweepMerger};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bed::{parse_intervals, read_intervals, BedError, BedReader};
    pub use crate::commands::{CleanNamesCommand, StackCommand};
    pub use crate::config::{AbsentNamePolicy, EmitMode, MergeConfig};
    pub use crate::interval::{GenomicInterval, SubInterval};
    pub use crate::merger::{sweep_intervals, IntervalSweepMerger};
}
