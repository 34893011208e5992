//! Parser for the students stream: `StudentId: Topic1, Topic2, ...`.

use crate::parsing::error::{InputError, Stream, SyntaxError};
use crate::parsing::{content_lines, is_valid_identifier, split_record};

/// A student record as read from the input, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStudent {
    /// 1-based line number the record came from.
    pub line: u32,
    pub id: String,
    /// Preference tokens in listed order, unchecked against the catalog.
    pub preferences: Vec<String>,
}

/// Parse the students stream, pushing grammar problems into `errors`.
///
/// Records with a syntax problem are dropped entirely; cross-record rules
/// (preference count, duplicates, unknown topics) are the validator's job.
pub fn parse_students(text: &str, errors: &mut Vec<InputError>) -> Vec<RawStudent> {
    let mut records = Vec::new();

    for (line, content) in content_lines(text) {
        let Some((id, rhs)) = split_record(content) else {
            errors.push(InputError::syntax(
                Stream::Students,
                line,
                SyntaxError::MissingSeparator,
            ));
            continue;
        };

        if id.is_empty() {
            errors.push(InputError::syntax(
                Stream::Students,
                line,
                SyntaxError::EmptyIdentifier,
            ));
            continue;
        }
        if !is_valid_identifier(id) {
            errors.push(InputError::syntax(
                Stream::Students,
                line,
                SyntaxError::InvalidIdentifier(id.to_string()),
            ));
            continue;
        }

        let mut preferences = Vec::new();
        let mut bad_token = false;
        for token in rhs.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            if is_valid_identifier(token) {
                preferences.push(token.to_string());
            } else {
                errors.push(InputError::syntax(
                    Stream::Students,
                    line,
                    SyntaxError::InvalidIdentifier(token.to_string()),
                ));
                bad_token = true;
            }
        }
        if bad_token {
            continue;
        }

        records.push(RawStudent {
            line,
            id: id.to_string(),
            preferences,
        });
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_students_basic() {
        let mut errors = Vec::new();
        let records = parse_students("BDBA001: T01, T02, T03\n", &mut errors);

        assert!(errors.is_empty());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "BDBA001");
        assert_eq!(records[0].preferences, vec!["T01", "T02", "T03"]);
    }

    #[test]
    fn test_parse_students_trims_tokens() {
        let mut errors = Vec::new();
        let records = parse_students("  BCSAI001 :  T01 ,T02  \n", &mut errors);

        assert!(errors.is_empty());
        assert_eq!(records[0].id, "BCSAI001");
        assert_eq!(records[0].preferences, vec!["T01", "T02"]);
    }

    #[test]
    fn test_parse_students_missing_separator() {
        let mut errors = Vec::new();
        let records = parse_students("BDBA001 T01 T02\n", &mut errors);

        assert!(records.is_empty());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line, 1);
    }

    #[test]
    fn test_parse_students_invalid_topic_token_drops_record() {
        let mut errors = Vec::new();
        let records = parse_students("BDBA001: T01, T-02\n", &mut errors);

        assert!(records.is_empty());
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_parse_students_empty_stream() {
        let mut errors = Vec::new();
        let records = parse_students("# only comments\n\n", &mut errors);

        assert!(records.is_empty());
        assert!(errors.is_empty());
    }
}
