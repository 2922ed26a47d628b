//! Name-column cleanup for BED files.
//!
//! Rewrites column 4 to its deduplicated, sorted `;`-joined form, e.g. after
//! a merge tool concatenated names with repeats:
//!
//! ```text
//! chr1  100  200  geneB;geneA;geneB  0  +
//! chr1  100  200  geneA;geneB        0  +
//! ```
//!
//! Tab-separated records keep every other column byte for byte. A record
//! without tabs is split on whitespace, the same way the BED reader splits
//! it, and is written back tab-joined. Header lines and records with fewer
//! than four columns pass through unchanged, so the pass is idempotent.

use crate::bed::BedError;
use crate::streaming::buffers::{DEFAULT_INPUT_BUFFER, DEFAULT_LINE_BUFFER};
use crate::streaming::parsing::split_fields;
use crate::streaming::{clean_name_field, should_skip_line, BedWriter};
use memchr::{memchr, memchr_iter};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

/// Name cleanup command.
#[derive(Debug, Clone, Default)]
pub struct CleanNamesCommand;

impl CleanNamesCommand {
    pub fn new() -> Self {
        Self
    }

    /// Execute on a BED file.
    pub fn run<P: AsRef<Path>, W: Write>(
        &self,
        input_path: P,
        output: &mut W,
    ) -> Result<CleanNamesStats, BedError> {
        let file = File::open(input_path.as_ref())?;
        self.run_streaming(BufReader::with_capacity(DEFAULT_INPUT_BUFFER, file), output)
    }

    /// Execute from stdin.
    pub fn run_stdin<W: Write>(&self, output: &mut W) -> Result<CleanNamesStats, BedError> {
        let stdin = io::stdin();
        self.run_streaming(stdin.lock(), output)
    }

    /// Stream lines through, rewriting the name column of each record.
    pub fn run_streaming<R: BufRead, W: Write>(
        &self,
        mut reader: R,
        output: &mut W,
    ) -> Result<CleanNamesStats, BedError> {
        let mut stats = CleanNamesStats::default();
        let mut writer = BedWriter::new(output);
        let mut line_buf = String::with_capacity(DEFAULT_LINE_BUFFER);

        loop {
            line_buf.clear();
            if reader.read_line(&mut line_buf)? == 0 {
                break;
            }
            stats.lines_read += 1;

            let line = line_buf.trim_end_matches(&['\n', '\r'][..]);
            if should_skip_line(line.as_bytes()) {
                writer.write_line(line.as_bytes())?;
                continue;
            }

            match clean_line(line) {
                Some(cleaned) => {
                    if cleaned != line {
                        stats.lines_changed += 1;
                    }
                    writer.write_line(cleaned.as_bytes())?;
                }
                None => writer.write_line(line.as_bytes())?,
            }
        }

        writer.flush()?;
        Ok(stats)
    }
}

/// Clean the name column of one record.
///
/// Returns None when the record has no name column.
pub fn clean_line(line: &str) -> Option<String> {
    if memchr(b'\t', line.as_bytes()).is_none() {
        return clean_whitespace_line(line);
    }

    let tabs: Vec<usize> = memchr_iter(b'\t', line.as_bytes()).take(4).collect();
    if tabs.len() < 3 {
        return None;
    }
    let name_start = tabs[2] + 1;
    let name_end = tabs.get(3).copied().unwrap_or(line.len());

    let mut cleaned = String::with_capacity(line.len());
    cleaned.push_str(&line[..name_start]);
    cleaned.push_str(&clean_name_field(&line[name_start..name_end]));
    cleaned.push_str(&line[name_end..]);
    Some(cleaned)
}

/// Whitespace-aligned record: re-emit tab-joined with column 4 cleaned.
fn clean_whitespace_line(line: &str) -> Option<String> {
    let fields = split_fields(line);
    if fields.len() < 4 {
        return None;
    }
    let name = clean_name_field(fields[3]);

    let mut cleaned = String::with_capacity(line.len());
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            cleaned.push('\t');
        }
        cleaned.push_str(if i == 3 { name.as_str() } else { field });
    }
    Some(cleaned)
}

/// Statistics from a name cleanup run.
#[derive(Debug, Default, Clone)]
pub struct CleanNamesStats {
    /// Number of lines read, headers included
    pub lines_read: usize,
    /// Number of records rewritten
    pub lines_changed: usize,
}

impl std::fmt::Display for CleanNamesStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Read: {}, Changed: {}",
            self.lines_read, self.lines_changed
        )
    }
}
