//! Parser for the topics stream: `TopicId: Area`.

use crate::parsing::error::{InputError, Stream, SyntaxError};
use crate::parsing::{content_lines, is_valid_identifier, split_record};

/// A topic record as read from the input, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTopic {
    /// 1-based line number the record came from.
    pub line: u32,
    pub id: String,
    /// Everything after the colon, trimmed. May be empty; the validator
    /// turns that into `MissingArea`.
    pub area: String,
}

/// Parse the topics stream, pushing grammar problems into `errors`.
pub fn parse_topics(text: &str, errors: &mut Vec<InputError>) -> Vec<RawTopic> {
    let mut records = Vec::new();

    for (line, content) in content_lines(text) {
        let Some((id, area)) = split_record(content) else {
            errors.push(InputError::syntax(
                Stream::Topics,
                line,
                SyntaxError::MissingSeparator,
            ));
            continue;
        };

        if id.is_empty() {
            errors.push(InputError::syntax(
                Stream::Topics,
                line,
                SyntaxError::EmptyIdentifier,
            ));
            continue;
        }
        if !is_valid_identifier(id) {
            errors.push(InputError::syntax(
                Stream::Topics,
                line,
                SyntaxError::InvalidIdentifier(id.to_string()),
            ));
            continue;
        }

        records.push(RawTopic {
            line,
            id: id.to_string(),
            area: area.to_string(),
        });
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_topics_basic() {
        let mut errors = Vec::new();
        let records = parse_topics("T01: Data Science\nT02: Machine Learning\n", &mut errors);

        assert!(errors.is_empty());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "T01");
        assert_eq!(records[0].area, "Data Science");
    }

    #[test]
    fn test_parse_topics_area_keeps_inner_punctuation() {
        let mut errors = Vec::new();
        let records = parse_topics("T01: NLP, Speech & Text\n", &mut errors);

        assert!(errors.is_empty());
        assert_eq!(records[0].area, "NLP, Speech & Text");
    }

    #[test]
    fn test_parse_topics_empty_area_kept_for_validator() {
        let mut errors = Vec::new();
        let records = parse_topics("T01:\n", &mut errors);

        assert!(errors.is_empty());
        assert_eq!(records[0].area, "");
    }

    #[test]
    fn test_parse_topics_missing_separator() {
        let mut errors = Vec::new();
        let records = parse_topics("T01 Data Science\n", &mut errors);

        assert!(records.is_empty());
        assert_eq!(errors.len(), 1);
    }
}
