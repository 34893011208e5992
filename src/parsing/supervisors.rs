//! Parser for the supervisors stream:
//! `SupervisorId: Capacity, Bachelor:Topic:Level, ...`.

use crate::core::types::ExpertiseLevel;
use crate::parsing::error::{InputError, Stream, SyntaxError};
use crate::parsing::{content_lines, is_valid_identifier, split_record};

/// One `Bachelor:Topic:Level` triple, unchecked against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    /// Bachelor tag as written; `_`/`+` normalization happens in the
    /// validator.
    pub program: String,
    pub topic: String,
    pub level: ExpertiseLevel,
}

/// A supervisor record as read from the input, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSupervisor {
    /// 1-based line number the record came from.
    pub line: u32,
    pub id: String,
    /// Raw capacity value; the `[1, 10]` range check is the validator's job.
    pub capacity: u32,
    pub entries: Vec<RawEntry>,
}

/// Parse the supervisors stream, pushing grammar problems into `errors`.
///
/// A record with any syntax problem (bad capacity, malformed entry, unknown
/// level token) is dropped entirely; every problem on the line is still
/// reported.
pub fn parse_supervisors(text: &str, errors: &mut Vec<InputError>) -> Vec<RawSupervisor> {
    let mut records = Vec::new();

    for (line, content) in content_lines(text) {
        let Some((id, rhs)) = split_record(content) else {
            errors.push(InputError::syntax(
                Stream::Supervisors,
                line,
                SyntaxError::MissingSeparator,
            ));
            continue;
        };

        if id.is_empty() {
            errors.push(InputError::syntax(
                Stream::Supervisors,
                line,
                SyntaxError::EmptyIdentifier,
            ));
            continue;
        }
        if !is_valid_identifier(id) {
            errors.push(InputError::syntax(
                Stream::Supervisors,
                line,
                SyntaxError::InvalidIdentifier(id.to_string()),
            ));
            continue;
        }

        let mut fields = rhs.split(',').map(str::trim);
        let capacity_token = fields.next().unwrap_or("");
        let Ok(capacity) = capacity_token.parse::<u32>() else {
            errors.push(InputError::syntax(
                Stream::Supervisors,
                line,
                SyntaxError::InvalidCapacity(capacity_token.to_string()),
            ));
            continue;
        };

        let mut entries = Vec::new();
        let mut bad_entry = false;
        for item in fields.filter(|item| !item.is_empty()) {
            match parse_entry(item) {
                Ok(entry) => entries.push(entry),
                Err(error) => {
                    errors.push(InputError::syntax(Stream::Supervisors, line, error));
                    bad_entry = true;
                }
            }
        }
        if bad_entry {
            continue;
        }

        records.push(RawSupervisor {
            line,
            id: id.to_string(),
            capacity,
            entries,
        });
    }

    records
}

fn parse_entry(item: &str) -> Result<RawEntry, SyntaxError> {
    let fields: Vec<&str> = item.split(':').map(str::trim).collect();
    let [program, topic, level] = fields.as_slice() else {
        return Err(SyntaxError::MalformedEntry(item.to_string()));
    };

    if !is_valid_identifier(program) || !is_valid_identifier(topic) {
        return Err(SyntaxError::MalformedEntry(item.to_string()));
    }

    let level = ExpertiseLevel::parse(level).map_err(|e| SyntaxError::InvalidLevel(e.0))?;

    Ok(RawEntry {
        program: (*program).to_string(),
        topic: (*topic).to_string(),
        level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_supervisors_basic() {
        let mut errors = Vec::new();
        let records = parse_supervisors(
            "SUP01: 5, BDBA:T01:Expert, BCSAI:T02:Advanced\n",
            &mut errors,
        );

        assert!(errors.is_empty());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "SUP01");
        assert_eq!(records[0].capacity, 5);
        assert_eq!(records[0].entries.len(), 2);
        assert_eq!(records[0].entries[0].program, "BDBA");
        assert_eq!(records[0].entries[0].topic, "T01");
        assert_eq!(records[0].entries[0].level, ExpertiseLevel::Expert);
    }

    #[test]
    fn test_parse_supervisors_underscore_tag_kept_raw() {
        let mut errors = Vec::new();
        let records = parse_supervisors("SUP01: 3, BBA_BDBA:T01:Expert\n", &mut errors);

        assert!(errors.is_empty());
        assert_eq!(records[0].entries[0].program, "BBA_BDBA");
    }

    #[test]
    fn test_parse_supervisors_bad_capacity() {
        let mut errors = Vec::new();
        let records = parse_supervisors("SUP01: five, BDBA:T01:Expert\n", &mut errors);

        assert!(records.is_empty());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("five"));
    }

    #[test]
    fn test_parse_supervisors_unknown_level() {
        let mut errors = Vec::new();
        let records = parse_supervisors("SUP01: 3, BDBA:T01:Master\n", &mut errors);

        assert!(records.is_empty());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("Master"));
    }

    #[test]
    fn test_parse_supervisors_malformed_entry() {
        let mut errors = Vec::new();
        let records = parse_supervisors("SUP01: 3, BDBA:T01\n", &mut errors);

        assert!(records.is_empty());
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_parse_supervisors_no_entries_kept_for_validator() {
        // Range and non-emptiness are semantic checks; the grammar accepts it.
        let mut errors = Vec::new();
        let records = parse_supervisors("SUP01: 3\n", &mut errors);

        assert!(errors.is_empty());
        assert_eq!(records.len(), 1);
        assert!(records[0].entries.is_empty());
    }

    #[test]
    fn test_parse_supervisors_capacity_zero_kept_for_validator() {
        let mut errors = Vec::new();
        let records = parse_supervisors("SUP01: 0, BDBA:T01:Expert\n", &mut errors);

        assert!(errors.is_empty());
        assert_eq!(records[0].capacity, 0);
    }
}
