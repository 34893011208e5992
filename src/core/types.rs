use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Handle for a student in a validated instance.
///
/// Handles are dense indexes assigned by the validator. Students are interned
/// in ascending lexicographic order of their raw ids, so comparing handles is
/// equivalent to comparing ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub u32);

/// Handle for a topic in a validated instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicId(pub u32);

/// Handle for a supervisor in a validated instance.
///
/// Like [`StudentId`], ordering of handles matches lexicographic ordering of
/// the raw supervisor ids; the catalog tie-break relies on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupervisorId(pub u32);

/// Handle for a bachelor program tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgramId(pub u32);

macro_rules! impl_index {
    ($($ty:ty),+) => {
        $(impl $ty {
            /// Position of this handle in the instance's dense tables.
            #[must_use]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        })+
    };
}

impl_index!(StudentId, TopicId, SupervisorId, ProgramId);

/// Supervisor expertise level for a (bachelor, topic) combination.
///
/// The derived ordering is `Beginner < Intermediate < Advanced < Expert`;
/// both topic ownership and the eviction rule compare levels through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExpertiseLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

/// Error for an unrecognized expertise level token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown expertise level '{0}', expected Expert, Advanced, Intermediate or Beginner")]
pub struct InvalidLevel(pub String);

impl ExpertiseLevel {
    /// Parse the canonical token. Tokens are case-sensitive.
    pub fn parse(s: &str) -> Result<Self, InvalidLevel> {
        match s {
            "Expert" => Ok(Self::Expert),
            "Advanced" => Ok(Self::Advanced),
            "Intermediate" => Ok(Self::Intermediate),
            "Beginner" => Ok(Self::Beginner),
            other => Err(InvalidLevel(other.to_string())),
        }
    }

    /// Canonical input/output token.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expert => "Expert",
            Self::Advanced => "Advanced",
            Self::Intermediate => "Intermediate",
            Self::Beginner => "Beginner",
        }
    }
}

impl std::fmt::Display for ExpertiseLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExpertiseLevel {
    type Err = InvalidLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Per-student state of the matching engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentStatus {
    /// Still has untried preferences and no assignment.
    Unproposed,
    /// Currently assigned to a topic.
    Matched,
    /// Unmatched with no preferences left to propose to.
    Exhausted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(ExpertiseLevel::Expert > ExpertiseLevel::Advanced);
        assert!(ExpertiseLevel::Advanced > ExpertiseLevel::Intermediate);
        assert!(ExpertiseLevel::Intermediate > ExpertiseLevel::Beginner);
    }

    #[test]
    fn test_level_parse_case_sensitive() {
        assert_eq!(ExpertiseLevel::parse("Expert"), Ok(ExpertiseLevel::Expert));
        assert!(ExpertiseLevel::parse("expert").is_err());
        assert!(ExpertiseLevel::parse("EXPERT").is_err());
        assert!(ExpertiseLevel::parse("").is_err());
    }

    #[test]
    fn test_level_round_trip() {
        for level in [
            ExpertiseLevel::Beginner,
            ExpertiseLevel::Intermediate,
            ExpertiseLevel::Advanced,
            ExpertiseLevel::Expert,
        ] {
            assert_eq!(ExpertiseLevel::parse(level.as_str()), Ok(level));
        }
    }

    #[test]
    fn test_handle_ordering_matches_numeric() {
        assert!(StudentId(0) < StudentId(1));
        assert!(SupervisorId(3) > SupervisorId(2));
    }
}
