//! Context formatting for retrieved discussion fragments.
//!
//! Reconstructs the canonical stored-fragment text blocks into citation-ready
//! context for the prompt. Parsing is deliberately lossy: a malformed fragment
//! is dropped rather than failing the whole answer.

const DATE_PREFIX: &str = "Date:";
const COMMENT_SCORE_PREFIX: &str = "Comment score: ";
const PARENT_COMMENT_PREFIX: &str = "Parent comment: ";
const PARENT_SCORE_PREFIX: &str = "Parent score: ";
const COMMENT_PREFIX: &str = "Comment: ";

/// Format retrieved fragments into the joined context string for the prompt.
///
/// Fragments that do not start with the date prefix are skipped. Surviving
/// blocks keep their input order, which is what citation numbers in the answer
/// refer to. Returns an empty string for empty input.
pub fn format_context(fragments: &[String]) -> String {
    fragments
        .iter()
        .filter_map(|text| format_fragment(text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Reconstruct one fragment, or None if it fails the date-line check.
fn format_fragment(text: &str) -> Option<String> {
    if !text.starts_with(DATE_PREFIX) {
        return None;
    }

    let mut lines = text.lines();
    let date_line = lines.next()?;

    let mut comment_score: Option<&str> = None;
    let mut comment_text = "";
    let mut parent_text: Option<&str> = None;
    let mut parent_score: Option<&str> = None;

    for line in lines {
        if let Some(rest) = line.strip_prefix(COMMENT_SCORE_PREFIX) {
            comment_score = Some(rest);
        } else if let Some(rest) = line.strip_prefix(PARENT_COMMENT_PREFIX) {
            parent_text = Some(rest);
        } else if let Some(rest) = line.strip_prefix(PARENT_SCORE_PREFIX) {
            parent_score = Some(rest);
        } else if let Some(rest) = line.strip_prefix(COMMENT_PREFIX) {
            comment_text = rest;
        }
        // Unknown lines (including blanks) are ignored.
    }

    let mut entry = format!("{}\n", date_line);

    // Parent annotation is all-or-nothing: both text and score, or neither.
    if let (Some(parent), Some(score)) = (parent_text.filter(|t| !t.is_empty()), parent_score) {
        entry.push_str(&format!("Parent Comment (Score: {}): {}\n", score, parent));
    }

    entry.push_str(&format!(
        "Comment (Score: {}): {}",
        comment_score.unwrap_or("None"),
        comment_text
    ));

    Some(entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_fragment() {
        let input = vec![
            "Date: 2024-01-05\nComment score: 12\nComment: Amex Cobalt gives 5x on groceries"
                .to_string(),
        ];
        assert_eq!(
            format_context(&input),
            "Date: 2024-01-05\nComment (Score: 12): Amex Cobalt gives 5x on groceries"
        );
    }

    #[test]
    fn test_fragment_with_parent() {
        let input = vec![
            "Date: 2024-01-05\nComment score: 3\nParent comment: Does this work at Metro?\nParent score: 8\nComment: Yes, confirmed."
                .to_string(),
        ];
        assert_eq!(
            format_context(&input),
            "Date: 2024-01-05\nParent Comment (Score: 8): Does this work at Metro?\nComment (Score: 3): Yes, confirmed."
        );
    }

    #[test]
    fn test_parent_annotation_is_all_or_nothing() {
        let only_text =
            "Date: 2024-01-05\nComment score: 3\nParent comment: hello\nComment: reply".to_string();
        let only_score =
            "Date: 2024-01-05\nComment score: 3\nParent score: 8\nComment: reply".to_string();

        for input in [only_text, only_score] {
            let formatted = format_context(&[input]);
            assert!(!formatted.contains("Parent Comment"), "got: {}", formatted);
            assert!(formatted.contains("Comment (Score: 3): reply"));
        }
    }

    #[test]
    fn test_missing_score_renders_none_placeholder() {
        let input = vec!["Date: 2024-01-05\nComment: scoreless".to_string()];
        assert_eq!(
            format_context(&input),
            "Date: 2024-01-05\nComment (Score: None): scoreless"
        );
    }

    #[test]
    fn test_malformed_fragments_dropped_order_preserved() {
        let input = vec![
            "Date: 2024-01-05\nComment score: 1\nComment: first".to_string(),
            "totally unrelated text".to_string(),
            "Date: 2024-01-06\nComment score: 2\nComment: second".to_string(),
        ];

        let formatted = format_context(&input);
        let blocks: Vec<&str> = formatted.split("\n\n").collect();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].contains("first"));
        assert!(blocks[1].contains("second"));
    }

    #[test]
    fn test_empty_input_yields_empty_string() {
        assert_eq!(format_context(&[]), "");
    }

    #[test]
    fn test_formatting_is_idempotent_on_input() {
        let input = vec![
            "Date: 2024-01-05\nComment score: 3\nParent comment: q\nParent score: 8\nComment: a"
                .to_string(),
        ];
        assert_eq!(format_context(&input), format_context(&input));
    }

    #[test]
    fn test_tolerates_legacy_blank_slot_line() {
        // Older stored fragments carried an empty line where the parent block
        // would sit. Blank lines match no prefix and are skipped.
        let input =
            vec!["Date: 2024-01-05\nComment score: 7\n\nComment: no parent here".to_string()];
        assert_eq!(
            format_context(&input),
            "Date: 2024-01-05\nComment (Score: 7): no parent here"
        );
    }
}
