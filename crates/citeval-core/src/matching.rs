//! Hit predicates between a predicted citation and a ground-truth citation
//!
//! All three compare serialized segments. Segments on different paths never
//! match. Anything that fails to parse never matches either; callers are
//! expected to have validated their input first.

use std::fmt;

use crate::segment::Segment;

/// How permissive a prediction may be and still count as a hit.
///
/// Strict implies Cover implies Overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    /// Serialized forms are identical
    Strict,
    /// The prediction contains the whole truth range
    Cover,
    /// The ranges share at least one line
    Overlap,
}

impl MatchKind {
    /// All predicates, strictest first. This is also the output column order.
    pub const ALL: [MatchKind; 3] = [MatchKind::Strict, MatchKind::Cover, MatchKind::Overlap];

    /// Column suffix used in evaluated datasets
    pub fn column_label(&self) -> &'static str {
        match self {
            MatchKind::Strict => "Strict_Match",
            MatchKind::Cover => "Cover_Match",
            MatchKind::Overlap => "Overlap_Match",
        }
    }

    /// Whether `predicted` counts as a hit for `truth`.
    pub fn matches(&self, predicted: &str, truth: &str) -> bool {
        match self {
            MatchKind::Strict => strict_match(predicted, truth),
            MatchKind::Cover => cover_match(predicted, truth),
            MatchKind::Overlap => overlap_match(predicted, truth),
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_label())
    }
}

pub fn strict_match(predicted: &str, truth: &str) -> bool {
    predicted == truth
}

pub fn cover_match(predicted: &str, truth: &str) -> bool {
    match (Segment::parse(predicted), Segment::parse(truth)) {
        (Ok(p), Ok(t)) => p.covers(&t),
        _ => false,
    }
}

pub fn overlap_match(predicted: &str, truth: &str) -> bool {
    match (Segment::parse(predicted), Segment::parse(truth)) {
        (Ok(p), Ok(t)) => p.overlaps(&t),
        _ => false,
    }
}

/// True if `item` matches at least one member of `candidates`.
///
/// `predicate` receives `(item, candidate)`; callers orient the arguments so
/// the predicted segment always lands in the predicate's predicted slot.
pub fn is_hit<F>(item: &str, candidates: &[String], predicate: F) -> bool
where
    F: Fn(&str, &str) -> bool,
{
    candidates.iter().any(|candidate| predicate(item, candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_strict_is_character_identity() {
        assert!(strict_match("a.py:1~5", "a.py:1~5"));
        assert!(!strict_match("a.py:1~5", "a.py:1~6"));
        assert!(!strict_match("a.py:01~5", "a.py:1~5"));
    }

    #[test]
    fn test_cover_requires_containment() {
        assert!(cover_match("a.py:1~50", "a.py:10~20"));
        assert!(cover_match("a.py:10~20", "a.py:10~20"));
        assert!(!cover_match("a.py:15~25", "a.py:10~20"));
        assert!(!cover_match("a.py:12~18", "a.py:10~20"));
    }

    #[test]
    fn test_overlap_requires_shared_line() {
        assert!(overlap_match("a.py:15~25", "a.py:10~20"));
        assert!(overlap_match("a.py:20~30", "a.py:10~20"));
        assert!(!overlap_match("a.py:21~30", "a.py:10~20"));
    }

    #[test]
    fn test_different_paths_never_match() {
        for kind in MatchKind::ALL {
            assert!(!kind.matches("a.py:10~20", "b.py:10~20"), "{}", kind);
        }
    }

    #[test]
    fn test_unparseable_never_matches_range_predicates() {
        assert!(!cover_match("garbage", "a.py:1~2"));
        assert!(!overlap_match("a.py:1~2", "a.py:2-3"));
    }

    #[test]
    fn test_predicate_lattice_is_monotone() {
        let truth = "src/x.rs:10~20";
        let preds = [
            "src/x.rs:10~20",
            "src/x.rs:5~25",
            "src/x.rs:10~25",
            "src/x.rs:12~18",
            "src/x.rs:1~10",
            "src/x.rs:20~30",
            "src/x.rs:21~30",
            "src/x.rs:1~9",
        ];
        for pred in preds {
            if strict_match(pred, truth) {
                assert!(cover_match(pred, truth), "{pred}");
            }
            if cover_match(pred, truth) {
                assert!(overlap_match(pred, truth), "{pred}");
            }
        }
    }

    #[test]
    fn test_is_hit() {
        let truths = owned(&["a.py:1~5", "b.py:10~20"]);
        assert!(is_hit("b.py:12~14", &truths, overlap_match));
        assert!(!is_hit("b.py:12~14", &truths, cover_match));
        assert!(!is_hit("c.py:1~5", &truths, strict_match));
        assert!(!is_hit("a.py:1~5", &[], strict_match));
    }
}
