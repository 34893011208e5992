//! Parsers and validator for the three line-oriented input streams.
//!
//! All three streams share one line discipline:
//!
//! - UTF-8 text, LF or CRLF line endings
//! - `#` after leading whitespace starts a comment line
//! - blank lines are skipped
//! - one `LHS: RHS` record per non-comment line, split on the first `:`
//! - every field is trimmed of surrounding whitespace
//!
//! The streams themselves:
//!
//! | Stream | Shape |
//! |--------|-------|
//! | students | `StudentId: Topic1, Topic2, ... (1 to 5 topics)` |
//! | topics | `TopicId: Area` (area is free-form, may contain spaces) |
//! | supervisors | `SupervisorId: Capacity, Bachelor:Topic:Level, ...` |
//!
//! Identifiers are non-empty runs of ASCII alphanumerics plus the connectors
//! `+` and `_`. Bachelor tags treat `_` and `+` as equivalent.
//!
//! Parsing produces raw records with line numbers; [`validate`] turns them
//! into a validated [`Instance`](crate::core::instance::Instance), interning
//! all identifiers into dense handles. Errors from both phases are
//! accumulated and reported together, so one run surfaces every problem in
//! the input.

pub mod error;
pub mod students;
pub mod supervisors;
pub mod topics;
pub mod validate;

/// Non-comment, non-blank lines with their 1-based line numbers.
pub(crate) fn content_lines(text: &str) -> impl Iterator<Item = (u32, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i as u32 + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

/// Split a record into trimmed `(lhs, rhs)` on the first colon.
pub(crate) fn split_record(line: &str) -> Option<(&str, &str)> {
    line.split_once(':')
        .map(|(lhs, rhs)| (lhs.trim(), rhs.trim()))
}

/// Identifier charset check: ASCII alphanumerics plus `+`/`_`.
pub(crate) fn is_valid_identifier(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_lines_skip_comments_and_blanks() {
        let text = "# header\n\nT01: A\n   # indented comment\nT02: B\n";
        let lines: Vec<_> = content_lines(text).collect();
        assert_eq!(lines, vec![(3, "T01: A"), (5, "T02: B")]);
    }

    #[test]
    fn test_content_lines_crlf() {
        let text = "T01: A\r\nT02: B\r\n";
        let lines: Vec<_> = content_lines(text).collect();
        assert_eq!(lines, vec![(1, "T01: A"), (2, "T02: B")]);
    }

    #[test]
    fn test_split_record_first_colon_only() {
        assert_eq!(
            split_record("SUP01: 5, BDBA:T01:Expert"),
            Some(("SUP01", "5, BDBA:T01:Expert"))
        );
        assert_eq!(split_record("no separator"), None);
    }

    #[test]
    fn test_is_valid_identifier() {
        assert!(is_valid_identifier("BDBA001"));
        assert!(is_valid_identifier("BBA_BDBA001"));
        assert!(is_valid_identifier("BBA+BDBA"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("T 01"));
        assert!(!is_valid_identifier("T-01"));
    }
}
