//! Line-range citations of the form `path:start~end`
//!
//! The path is everything before the *last* colon, so paths that contain
//! colons themselves (Windows drive letters, URIs) still parse.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

static RANGE_RE: OnceLock<Regex> = OnceLock::new();

fn range_re() -> &'static Regex {
    RANGE_RE.get_or_init(|| {
        Regex::new(r"^([0-9]+)~([0-9]+)$").expect("segment range pattern is a valid regex")
    })
}

/// Reasons a citation string fails to parse
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegmentError {
    #[error("segment '{0}' has no ':' separating path and line range")]
    MissingSeparator(String),

    #[error("segment '{0}' has an empty path")]
    EmptyPath(String),

    #[error("segment '{0}' line range must look like start~end")]
    MalformedRange(String),

    #[error("segment '{segment}' starts after it ends ({start} > {end})")]
    InvertedRange {
        segment: String,
        start: u64,
        end: u64,
    },
}

/// An inclusive line range inside a named resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    path: String,
    start: u64,
    end: u64,
    /// Range text as written, so `01~10` renders back unchanged
    range: String,
}

impl Segment {
    /// Parse a `path:start~end` string.
    ///
    /// Line numbers are unsigned digit runs; `0` and leading zeros are
    /// accepted, and `start` may not exceed `end`.
    pub fn parse(s: &str) -> Result<Self, SegmentError> {
        let (path, range) = s
            .rsplit_once(':')
            .ok_or_else(|| SegmentError::MissingSeparator(s.to_string()))?;

        let caps = range_re()
            .captures(range)
            .ok_or_else(|| SegmentError::MalformedRange(s.to_string()))?;

        // Digit runs too long for u64 are as unusable as non-digits.
        let start: u64 = caps[1]
            .parse()
            .map_err(|_| SegmentError::MalformedRange(s.to_string()))?;
        let end: u64 = caps[2]
            .parse()
            .map_err(|_| SegmentError::MalformedRange(s.to_string()))?;

        if start > end {
            return Err(SegmentError::InvertedRange {
                segment: s.to_string(),
                start,
                end,
            });
        }
        if path.is_empty() {
            return Err(SegmentError::EmptyPath(s.to_string()));
        }

        Ok(Segment {
            path: path.to_string(),
            start,
            end,
            range: range.to_string(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    /// True if every line of `other` lies inside this segment (same path).
    pub fn covers(&self, other: &Segment) -> bool {
        self.path == other.path && self.start <= other.start && self.end >= other.end
    }

    /// True if the two segments share at least one line (same path).
    pub fn overlaps(&self, other: &Segment) -> bool {
        self.path == other.path && !(self.end < other.start || other.end < self.start)
    }
}

impl FromStr for Segment {
    type Err = SegmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Segment::parse(s)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path, self.range)
    }
}

/// Check the citation format without producing a [`Segment`].
pub fn is_valid_segment(s: &str) -> bool {
    Segment::parse(s).is_ok()
}

/// Split a newline-delimited citation list into trimmed, non-blank entries.
///
/// Entries are returned as written; no parsing happens here.
pub fn split_segment_list(list: &str) -> Vec<String> {
    list.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let seg = Segment::parse("a/b.py:1~10").unwrap();
        assert_eq!(seg.path(), "a/b.py");
        assert_eq!(seg.start(), 1);
        assert_eq!(seg.end(), 10);
    }

    #[test]
    fn test_parse_uses_last_colon() {
        let seg = Segment::parse(r"C:\repo\main.rs:3~3").unwrap();
        assert_eq!(seg.path(), r"C:\repo\main.rs");
        assert_eq!(seg.start(), 3);
        assert_eq!(seg.end(), 3);
    }

    #[test]
    fn test_display_round_trips_valid_strings() {
        for s in [
            "a/b.py:1~10",
            "src/lib.rs:42~42",
            "scheme://host/x.md:7~900",
            "weird name.txt:0~0",
            "a.py:01~10",
            "x:007~0010",
        ] {
            assert_eq!(Segment::parse(s).unwrap().to_string(), s);
        }
    }

    #[test]
    fn test_is_valid_segment() {
        assert!(is_valid_segment("a/b.py:1~10"));
        // line 0 is accepted as a start
        assert!(is_valid_segment("a/b.py:0~10"));
        assert_eq!(Segment::parse("a/b.py:0~10").unwrap().start(), 0);
        assert!(!is_valid_segment("a/b.py:10~1"));
        assert!(!is_valid_segment("a/b.py:1-10"));
        assert!(!is_valid_segment(":1~10"));
        assert!(!is_valid_segment("a/b.py"));
        assert!(!is_valid_segment("a/b.py:~10"));
        assert!(!is_valid_segment("a/b.py:1~10 "));
        assert!(!is_valid_segment(""));
    }

    #[test]
    fn test_error_variants() {
        assert_eq!(
            Segment::parse("nocolon"),
            Err(SegmentError::MissingSeparator("nocolon".to_string()))
        );
        assert_eq!(
            Segment::parse(":1~2"),
            Err(SegmentError::EmptyPath(":1~2".to_string()))
        );
        assert_eq!(
            Segment::parse("x:1-2"),
            Err(SegmentError::MalformedRange("x:1-2".to_string()))
        );
        assert!(matches!(
            Segment::parse("x:9~2"),
            Err(SegmentError::InvertedRange { start: 9, end: 2, .. })
        ));
    }

    #[test]
    fn test_leading_zeros_keep_numeric_value() {
        let seg = Segment::parse("x:007~0010").unwrap();
        assert_eq!(seg.start(), 7);
        assert_eq!(seg.end(), 10);
        assert!(seg.covers(&Segment::parse("x:8~9").unwrap()));
    }

    #[test]
    fn test_overflowing_line_number_is_malformed() {
        let s = "x:1~99999999999999999999999";
        assert!(matches!(
            Segment::parse(s),
            Err(SegmentError::MalformedRange(_))
        ));
    }

    #[test]
    fn test_covers_and_overlaps() {
        let outer = Segment::parse("a.py:10~20").unwrap();
        let inner = Segment::parse("a.py:12~18").unwrap();
        let shifted = Segment::parse("a.py:15~25").unwrap();
        let elsewhere = Segment::parse("b.py:10~20").unwrap();

        assert!(outer.covers(&inner));
        assert!(!inner.covers(&outer));
        assert!(!outer.covers(&shifted));
        assert!(outer.overlaps(&shifted));
        assert!(!outer.overlaps(&elsewhere));
        assert!(!outer.covers(&elsewhere));
    }

    #[test]
    fn test_touching_ranges_overlap() {
        let a = Segment::parse("a.py:1~5").unwrap();
        let b = Segment::parse("a.py:5~9").unwrap();
        let c = Segment::parse("a.py:6~9").unwrap();
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_split_segment_list() {
        let list = "  a.py:1~2\n\n b.py:3~4 \r\n   \n";
        assert_eq!(split_segment_list(list), vec!["a.py:1~2", "b.py:3~4"]);
        assert!(split_segment_list("").is_empty());
        assert!(split_segment_list("\n \n").is_empty());
    }
}
