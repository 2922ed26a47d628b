//! Efficient output formatting for streaming operations.
//!
//! Uses itoa for integer formatting and ryu for float formatting
//! to avoid allocation in the hot path.

use crate::bed::BedError;
use crate::interval::SubInterval;
use crate::streaming::buffers::DEFAULT_OUTPUT_BUFFER;
use std::io::{BufWriter, Write};

/// Buffered BED output writer.
pub struct BedWriter<W: Write> {
    writer: BufWriter<W>,
    itoa_buf: itoa::Buffer,
    ryu_buf: ryu::Buffer,
}

impl<W: Write> BedWriter<W> {
    /// Create a new BedWriter with the default output buffer.
    pub fn new(output: W) -> Self {
        Self::with_capacity(DEFAULT_OUTPUT_BUFFER, output)
    }

    /// Create a new BedWriter with specified buffer size.
    pub fn with_capacity(capacity: usize, output: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(capacity, output),
            itoa_buf: itoa::Buffer::new(),
            ryu_buf: ryu::Buffer::new(),
        }
    }

    /// Write a BED3 record (chrom, start, end).
    #[inline]
    pub fn write_bed3(&mut self, chrom: &[u8], start: u64, end: u64) -> Result<(), BedError> {
        self.writer.write_all(chrom)?;
        self.writer.write_all(b"\t")?;
        self.writer.write_all(self.itoa_buf.format(start).as_bytes())?;
        self.writer.write_all(b"\t")?;
        self.writer.write_all(self.itoa_buf.format(end).as_bytes())?;
        Ok(())
    }

    /// Write one sub-interval line: BED3, then the label and/or score columns it carries.
    #[inline]
    pub fn write_sub_interval(&mut self, sub: &SubInterval) -> Result<(), BedError> {
        self.write_bed3(sub.chrom.as_bytes(), sub.start, sub.end)?;
        if let Some(ref label) = sub.label {
            self.writer.write_all(b"\t")?;
            self.writer.write_all(label.as_bytes())?;
        }
        if let Some(score) = sub.score {
            self.writer.write_all(b"\t")?;
            self.write_score(score)?;
        }
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Write a score. Whole numbers go through itoa (`3`), the rest through ryu (`2.5`).
    #[inline]
    pub fn write_score(&mut self, score: f64) -> Result<(), BedError> {
        if score.fract() == 0.0 && score.abs() < i64::MAX as f64 {
            self.writer
                .write_all(self.itoa_buf.format(score as i64).as_bytes())?;
        } else {
            self.writer.write_all(self.ryu_buf.format(score).as_bytes())?;
        }
        Ok(())
    }

    /// Write a full line as-is with newline.
    #[inline]
    pub fn write_line(&mut self, line: &[u8]) -> Result<(), BedError> {
        self.writer.write_all(line)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Write a newline character.
    #[inline]
    pub fn write_newline(&mut self) -> Result<(), BedError> {
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Flush the output buffer.
    pub fn flush(&mut self) -> Result<(), BedError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(label: Option<&str>, score: Option<f64>) -> SubInterval {
        SubInterval {
            chrom: "chr1".to_string(),
            start: 100,
            end: 200,
            label: label.map(str::to_string),
            score,
        }
    }

    fn render(records: &[SubInterval]) -> String {
        let mut output = Vec::new();
        {
            let mut writer = BedWriter::new(&mut output);
            for r in records {
                writer.write_sub_interval(r).unwrap();
            }
            writer.flush().unwrap();
        }
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_write_bed3() {
        let mut output = Vec::new();
        {
            let mut writer = BedWriter::new(&mut output);
            writer.write_bed3(b"chr1", 100, 200).unwrap();
            writer.write_newline().unwrap();
            writer.flush().unwrap();
        }
        assert_eq!(output, b"chr1\t100\t200\n");
    }

    #[test]
    fn test_write_label_only() {
        assert_eq!(render(&[sub(Some("A;B"), None)]), "chr1\t100\t200\tA;B\n");
    }

    #[test]
    fn test_write_score_only() {
        assert_eq!(render(&[sub(None, Some(3.0))]), "chr1\t100\t200\t3\n");
        assert_eq!(render(&[sub(None, Some(0.5))]), "chr1\t100\t200\t0.5\n");
    }

    #[test]
    fn test_write_label_and_score() {
        assert_eq!(
            render(&[sub(Some("A"), Some(-2.0))]),
            "chr1\t100\t200\tA\t-2\n"
        );
    }
}
