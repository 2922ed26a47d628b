//! Field-level BED parsing helpers.
//!
//! These functions work on borrowed slices of the line buffer and only
//! allocate for the names that end up in a record.

use memchr::{memchr, memchr_iter};

/// Score assigned to records without a usable score column.
pub const DEFAULT_SCORE: f64 = 1.0;

/// Fast u64 parsing - no allocation, no error formatting.
///
/// Returns None if the input is empty, contains non-digit characters,
/// or does not fit in a u64.
#[inline(always)]
pub fn parse_u64_fast(bytes: &[u8]) -> Option<u64> {
    if bytes.is_empty() {
        return None;
    }
    let mut n: u64 = 0;
    for &b in bytes {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return None;
        }
        n = n.checked_mul(10)?.checked_add(d as u64)?;
    }
    Some(n)
}

/// Split a record into its columns.
///
/// Columns are tab-separated. A line without any tab is split on runs of
/// ASCII whitespace instead, so hand-written space-aligned input still parses.
#[inline]
pub fn split_fields(line: &str) -> Vec<&str> {
    let bytes = line.as_bytes();
    if memchr(b'\t', bytes).is_none() {
        return line.split_ascii_whitespace().collect();
    }

    let mut fields = Vec::with_capacity(8);
    let mut from = 0;
    for tab in memchr_iter(b'\t', bytes) {
        fields.push(&line[from..tab]);
        from = tab + 1;
    }
    fields.push(&line[from..]);
    fields
}

/// Parse a `;`-separated name column into a sorted, deduplicated name set.
///
/// `.` and empty entries mean "no name".
pub fn parse_names(field: &str) -> Vec<String> {
    let mut names: Vec<String> = field
        .split(';')
        .map(str::trim)
        .filter(|n| !n.is_empty() && *n != ".")
        .map(str::to_string)
        .collect();
    names.sort_unstable();
    names.dedup();
    names
}

/// Parse the score column, falling back to [`DEFAULT_SCORE`].
#[inline]
pub fn parse_score(field: Option<&str>) -> f64 {
    field
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|s| s.is_finite())
        .unwrap_or(DEFAULT_SCORE)
}

/// Join a name column back into its cleaned form.
///
/// Returns `.` when nothing is left after cleaning.
pub fn clean_name_field(field: &str) -> String {
    let names = parse_names(field);
    if names.is_empty() {
        ".".to_string()
    } else {
        names.join(";")
    }
}

/// Check if a line should be skipped (empty, comment, or header).
#[inline(always)]
pub fn should_skip_line(line: &[u8]) -> bool {
    line.is_empty() || line[0] == b'#' || line.starts_with(b"track") || line.starts_with(b"browser")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_u64_fast() {
        assert_eq!(parse_u64_fast(b"12345"), Some(12345));
        assert_eq!(parse_u64_fast(b"0"), Some(0));
        assert_eq!(parse_u64_fast(b""), None);
        assert_eq!(parse_u64_fast(b"abc"), None);
        assert_eq!(parse_u64_fast(b"-5"), None);
        assert_eq!(parse_u64_fast(b"18446744073709551615"), Some(u64::MAX));
        assert_eq!(parse_u64_fast(b"18446744073709551616"), None);
    }

    #[test]
    fn test_split_fields_tabs() {
        assert_eq!(split_fields("chr1\t0\t10\tA"), vec!["chr1", "0", "10", "A"]);
        // Empty columns survive tab splitting
        assert_eq!(split_fields("chr1\t0\t10\t"), vec!["chr1", "0", "10", ""]);
    }

    #[test]
    fn test_split_fields_whitespace_fallback() {
        assert_eq!(split_fields("chr1  0   10  A"), vec!["chr1", "0", "10", "A"]);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(parse_names("B;A;B"), vec!["A", "B"]);
        assert!(parse_names(".").is_empty());
        assert!(parse_names("").is_empty());
        assert_eq!(parse_names("A;;."), vec!["A"]);
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score(Some("5")), 5.0);
        assert_eq!(parse_score(Some("2.5")), 2.5);
        assert_eq!(parse_score(Some(".")), DEFAULT_SCORE);
        assert_eq!(parse_score(Some("nan")), DEFAULT_SCORE);
        assert_eq!(parse_score(None), DEFAULT_SCORE);
    }

    #[test]
    fn test_clean_name_field() {
        assert_eq!(clean_name_field("gene2;gene1;gene2"), "gene1;gene2");
        assert_eq!(clean_name_field("."), ".");
    }

    #[test]
    fn test_should_skip_line() {
        assert!(should_skip_line(b""));
        assert!(should_skip_line(b"#comment"));
        assert!(should_skip_line(b"track name=foo"));
        assert!(should_skip_line(b"browser position chr1:1-100"));
        assert!(!should_skip_line(b"chr1\t100\t200"));
    }
}
