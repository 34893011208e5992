use serde::{Deserialize, Serialize};

use crate::core::types::{ProgramId, TopicId};

/// Maximum number of topic preferences a student may list.
pub const MAX_PREFERENCES: usize = 5;

/// A student with an ordered topic preference list.
///
/// Built by the validator and immutable afterwards. The preference list holds
/// between 1 and [`MAX_PREFERENCES`] distinct topics in the order the student
/// ranked them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Raw student id as it appeared in the input.
    pub name: String,

    /// Bachelor program inferred from the id prefix.
    pub program: ProgramId,

    /// Ranked topic preferences, most preferred first.
    pub preferences: Vec<TopicId>,
}

impl Student {
    /// 0-based position of `topic` in this student's preference list.
    #[must_use]
    pub fn rank_of(&self, topic: TopicId) -> Option<usize> {
        self.preferences.iter().position(|&t| t == topic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_of() {
        let student = Student {
            name: "BDBA001".to_string(),
            program: ProgramId(0),
            preferences: vec![TopicId(2), TopicId(0), TopicId(1)],
        };

        assert_eq!(student.rank_of(TopicId(2)), Some(0));
        assert_eq!(student.rank_of(TopicId(1)), Some(2));
        assert_eq!(student.rank_of(TopicId(7)), None);
    }
}
