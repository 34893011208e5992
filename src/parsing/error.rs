use thiserror::Error;

/// Which of the three input streams an error was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Students,
    Topics,
    Supervisors,
}

impl std::fmt::Display for Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Students => write!(f, "students"),
            Self::Topics => write!(f, "topics"),
            Self::Supervisors => write!(f, "supervisors"),
        }
    }
}

/// A line that does not conform to the input grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("missing ':' between identifier and payload")]
    MissingSeparator,

    #[error("empty identifier before ':'")]
    EmptyIdentifier,

    #[error("invalid identifier '{0}', expected ASCII alphanumerics, '+' or '_'")]
    InvalidIdentifier(String),

    #[error("invalid capacity '{0}', expected a decimal integer")]
    InvalidCapacity(String),

    #[error("unknown expertise level '{0}', expected Expert, Advanced, Intermediate or Beginner")]
    InvalidLevel(String),

    #[error("malformed expertise entry '{0}', expected Bachelor:Topic:Level")]
    MalformedEntry(String),
}

/// A well-formed line that violates a cross-record rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    #[error("unknown topic '{topic}' referenced by '{record}'")]
    UnknownTopic { record: String, topic: String },

    #[error("duplicate topic id '{0}'")]
    DuplicateTopic(String),

    #[error("duplicate student id '{0}'")]
    DuplicateStudent(String),

    #[error("duplicate supervisor id '{0}'")]
    DuplicateSupervisor(String),

    #[error("supervisor '{supervisor}' declares ({program}, {topic}) more than once")]
    DuplicateEntry {
        supervisor: String,
        program: String,
        topic: String,
    },

    #[error("supervisor '{supervisor}' has capacity {capacity}, expected 1 to 10")]
    CapacityOutOfRange { supervisor: String, capacity: u32 },

    #[error("supervisor '{0}' declares no expertise entries")]
    EmptySupervisorEntries(String),

    #[error("student '{student}' lists {count} preferences, expected 1 to 5")]
    PreferenceCountOutOfRange { student: String, count: usize },

    #[error("student '{student}' lists {count} preferences, exactly 5 required in strict mode")]
    PreferenceCountNotExact { student: String, count: usize },

    #[error("student '{student}' lists topic '{topic}' more than once")]
    DuplicatePreference { student: String, topic: String },

    #[error("topic '{0}' has no area")]
    MissingArea(String),
}

/// Kind of problem found in an input line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("{0}")]
    Syntax(#[from] SyntaxError),

    #[error("{0}")]
    Semantic(#[from] SemanticError),
}

impl ErrorKind {
    /// Short machine-readable tag, used by the JSON error listing.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Syntax(_) => "syntax",
            Self::Semantic(_) => "semantic",
        }
    }
}

/// One problem found in one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputError {
    pub stream: Stream,
    /// 1-based line number in the stream.
    pub line: u32,
    pub kind: ErrorKind,
}

impl InputError {
    pub fn syntax(stream: Stream, line: u32, error: SyntaxError) -> Self {
        Self {
            stream,
            line,
            kind: ErrorKind::Syntax(error),
        }
    }

    pub fn semantic(stream: Stream, line: u32, error: SemanticError) -> Self {
        Self {
            stream,
            line,
            kind: ErrorKind::Semantic(error),
        }
    }
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.stream, self.line, self.kind)
    }
}

/// All problems found across the three streams.
///
/// Parsing and validation never stop at the first problem; every error is
/// collected and surfaced in this single failure, sorted by stream and line.
/// The matcher only runs on a clean instance.
#[derive(Debug, Clone, Error)]
#[error("{} validation error(s) in input", .errors.len())]
pub struct ValidationErrors {
    pub errors: Vec<InputError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_display() {
        let err = InputError::semantic(
            Stream::Students,
            4,
            SemanticError::DuplicatePreference {
                student: "BDBA001".to_string(),
                topic: "T01".to_string(),
            },
        );
        assert_eq!(
            err.to_string(),
            "students:4: student 'BDBA001' lists topic 'T01' more than once"
        );
    }

    #[test]
    fn test_kind_tag() {
        let syntax = ErrorKind::Syntax(SyntaxError::MissingSeparator);
        let semantic = ErrorKind::Semantic(SemanticError::MissingArea("T01".to_string()));
        assert_eq!(syntax.tag(), "syntax");
        assert_eq!(semantic.tag(), "semantic");
    }
}
