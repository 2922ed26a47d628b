//! Streaming BED reader and the error type shared by the whole crate.

use crate::interval::GenomicInterval;
use crate::streaming::buffers::{DEFAULT_INPUT_BUFFER, DEFAULT_LINE_BUFFER};
use crate::streaming::parsing::{
    parse_names, parse_score, parse_u64_fast, should_skip_line, split_fields,
};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while reading or merging BED records.
///
/// Every variant is fatal for the stream it was raised on.
#[derive(Error, Debug)]
pub enum BedError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Fewer than three columns, or coordinates that are not integers.
    #[error("Malformed record at line {line}: {message}")]
    Malformed { line: usize, message: String },

    /// Start coordinate past the end coordinate.
    #[error("Coordinate error (start {start} > end {end}): {record}")]
    Coordinate { start: u64, end: u64, record: String },

    /// Input does not follow the required (chrom, start) order.
    #[error("Input has to be a sorted BED file: {0}")]
    Unsorted(String),
}

pub type Result<T> = std::result::Result<T, BedError>;

/// A streaming BED reader yielding [`GenomicInterval`]s.
///
/// Columns 1-3 are required; column 4 is read as a `;`-separated name set
/// and column 5 as the score. Anything after that is ignored.
pub struct BedReader<R: Read> {
    reader: BufReader<R>,
    line_number: usize,
    buffer: String,
}

impl BedReader<File> {
    /// Open a BED file from a path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(file))
    }
}

impl<R: Read> BedReader<R> {
    /// Create a new BED reader from any readable source.
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, DEFAULT_INPUT_BUFFER)
    }

    /// Create a BED reader with custom buffer capacity.
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader: BufReader::with_capacity(capacity, reader),
            line_number: 0,
            buffer: String::with_capacity(DEFAULT_LINE_BUFFER),
        }
    }

    /// Number of lines consumed so far, headers included.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Read the next interval.
    pub fn read_interval(&mut self) -> Result<Option<GenomicInterval>> {
        loop {
            self.buffer.clear();
            let bytes_read = self.reader.read_line(&mut self.buffer)?;
            if bytes_read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let line = self.buffer.trim_end_matches(&['\n', '\r'][..]);
            if line.trim().is_empty() || should_skip_line(line.as_bytes()) {
                continue;
            }

            return parse_line(line, self.line_number).map(Some);
        }
    }

    /// Get an iterator over all intervals.
    pub fn intervals(self) -> BedIntervalIter<R> {
        BedIntervalIter { reader: self }
    }
}

/// Parse a single data line into an interval.
fn parse_line(line: &str, line_number: usize) -> Result<GenomicInterval> {
    let fields = split_fields(line);

    if fields.len() < 3 {
        return Err(BedError::Malformed {
            line: line_number,
            message: format!("Expected at least 3 fields, got {}", fields.len()),
        });
    }

    let start = parse_position(fields[1], "start", line_number)?;
    let end = parse_position(fields[2], "end", line_number)?;

    if start > end {
        log::error!("coordinate error at line {}: {}", line_number, line);
        return Err(BedError::Coordinate {
            start,
            end,
            record: line.to_string(),
        });
    }

    Ok(GenomicInterval {
        chrom: fields[0].to_string(),
        start,
        end,
        names: fields.get(3).map(|f| parse_names(f)).unwrap_or_default(),
        score: parse_score(fields.get(4).copied()),
    })
}

fn parse_position(s: &str, field_name: &str, line_number: usize) -> Result<u64> {
    parse_u64_fast(s.trim().as_bytes()).ok_or_else(|| BedError::Malformed {
        line: line_number,
        message: format!("Invalid {} position: '{}'", field_name, s),
    })
}

/// Iterator over BED intervals.
pub struct BedIntervalIter<R: Read> {
    reader: BedReader<R>,
}

impl<R: Read> Iterator for BedIntervalIter<R> {
    type Item = Result<GenomicInterval>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_interval().transpose()
    }
}

/// Read all intervals from a BED file.
pub fn read_intervals<P: AsRef<Path>>(path: P) -> Result<Vec<GenomicInterval>> {
    BedReader::from_path(path)?.intervals().collect()
}

/// Parse intervals from a string (useful for testing).
pub fn parse_intervals(content: &str) -> Result<Vec<GenomicInterval>> {
    BedReader::new(content.as_bytes()).intervals().collect()
}
