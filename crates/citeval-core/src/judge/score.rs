//! Score extraction from judge verdicts.

use std::sync::OnceLock;

use regex::Regex;

static SCORE_RE: OnceLock<Regex> = OnceLock::new();

fn score_re() -> &'static Regex {
    SCORE_RE.get_or_init(|| {
        Regex::new(r"^\s*Candidate Answer Score:\s\[?([\d\.]+)\]?/10")
            .expect("score pattern is a valid regex")
    })
}

/// Pull the numeric score out of a verdict's leading score line.
///
/// Accepts `Candidate Answer Score: 7/10` and `Candidate Answer Score: [7.5]/10`.
/// Returns the number as written, or `None` when the verdict does not open
/// with a score line.
pub fn parse_score(verdict: &str) -> Option<&str> {
    score_re()
        .captures(verdict)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_and_bracketed() {
        assert_eq!(parse_score("Candidate Answer Score: 7/10\n..."), Some("7"));
        assert_eq!(parse_score("Candidate Answer Score: [7.5]/10"), Some("7.5"));
        assert_eq!(parse_score("Candidate Answer Score: [9/10"), Some("9"));
    }

    #[test]
    fn test_leading_whitespace_is_tolerated() {
        assert_eq!(parse_score("\n\n  Candidate Answer Score: 3/10"), Some("3"));
    }

    #[test]
    fn test_score_line_must_lead() {
        assert_eq!(parse_score("Summary first.\nCandidate Answer Score: 3/10"), None);
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(parse_score("I refuse to grade this."), None);
        assert_eq!(parse_score("Candidate Answer Score: seven/10"), None);
        assert_eq!(parse_score("Candidate Answer Score: 7/100"), Some("7"));
        assert_eq!(parse_score(""), None);
    }
}
