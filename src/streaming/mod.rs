//! Streaming utilities shared by the commands.
//!
//! - Field-level BED parsing
//! - Sort validation
//! - Buffered output formatting
//!
//! Nothing here holds more than one record at a time.

pub mod buffers;
pub mod output;
pub mod parsing;
pub mod validation;

pub use output::BedWriter;
pub use parsing::{clean_name_field, parse_names, parse_score, parse_u64_fast, should_skip_line};
pub use validation::SortValidator;
