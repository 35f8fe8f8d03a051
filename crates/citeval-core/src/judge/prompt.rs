//! Judge prompt construction.

use std::sync::OnceLock;

use regex::Regex;

/// Total points the judge grades against
pub const TOTAL_POINTS: u32 = 10;

static CRITERION_RE: OnceLock<Regex> = OnceLock::new();

fn criterion_re() -> &'static Regex {
    // "2. Names the failing module (3 points):"
    CRITERION_RE.get_or_init(|| {
        Regex::new(r"\d+\.\s.*?\(([\d\.]+)\spoint(s)?\):")
            .expect("criterion pattern is a valid regex")
    })
}

/// Point values of the numbered criteria in a rubric, in order.
///
/// Criteria look like `1. Some requirement (2.5 points):`. Rubrics without
/// such lines yield an empty list.
pub fn detect_criteria(rubric: &str) -> Vec<String> {
    criterion_re()
        .captures_iter(rubric)
        .map(|caps| caps[1].to_string())
        .collect()
}

fn criterion_block(index: usize, max_points: &str) -> String {
    format!(
        "Criterion {index}:\n   - [Score: x{index}/{max_points}]\n   - Rationale: [How the answer addresses this point]\n\n"
    )
}

/// The per-criterion section of the required output format.
fn output_format(rubric: &str) -> String {
    let criteria = detect_criteria(rubric);
    let mut out = String::new();

    if criteria.is_empty() {
        out.push_str(&criterion_block(1, "y1"));
        out.push_str(&criterion_block(2, "y2"));
        out.push_str("...");
    } else {
        for (i, points) in criteria.iter().enumerate() {
            out.push_str(&criterion_block(i + 1, points));
        }
    }

    out.trim().to_string()
}

/// Build the grading prompt for one candidate answer.
pub fn build_judge_prompt(
    question: &str,
    canonical_answer: &str,
    rubric: &str,
    candidate_answer: &str,
) -> String {
    format!(
        r#"Task: Grade a candidate answer to a question using the scoring criteria and the canonical answer.
Question:<question>{question}</question>

Canonical Answer:
<canonical_answer>
{canonical_answer}
</canonical_answer>

Scoring Criteria:
<evaluation>
{rubric}
</evaluation>
Total: {total} points

Candidate Answer:
<candidate_answer>
{candidate_answer}
</candidate_answer>

Grading Process:

Step 1: Compare the candidate answer with the canonical answer.
Step 2: For each scoring criterion:
Check whether the candidate answer explicitly addresses it.
Award full points when it is covered accurately and completely.
Award partial or no points when coverage is incomplete, wrong, or missing.
Step 3: Give a rationale for each scoring decision.

Do not output the process above; output only the grading result.
## Output Format
Follow this structure exactly (no free-form text):

Candidate Answer Score: [Total]/{total}

{format}"#,
        total = TOTAL_POINTS,
        format = output_format(rubric),
    )
}
