use serde::{Deserialize, Serialize};

use crate::core::student::Student;
use crate::core::supervisor::Supervisor;
use crate::core::topic::Topic;
use crate::core::types::{ProgramId, StudentId, SupervisorId, TopicId};

/// A fully validated matching instance.
///
/// All identifiers have been interned into dense handles by the validator:
/// students, topics and supervisors are each sorted by ascending raw id, so a
/// handle's numeric order equals the lexicographic order of the ids it stands
/// for. Program tags are interned into a sorted table as well.
///
/// The instance is immutable; the matching engine builds its own mutable
/// state on top of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    pub students: Vec<Student>,
    pub topics: Vec<Topic>,
    pub supervisors: Vec<Supervisor>,

    /// Canonical program tags, sorted; indexed by [`ProgramId`].
    pub programs: Vec<String>,
}

impl Instance {
    #[must_use]
    pub fn student(&self, id: StudentId) -> &Student {
        &self.students[id.index()]
    }

    #[must_use]
    pub fn topic(&self, id: TopicId) -> &Topic {
        &self.topics[id.index()]
    }

    #[must_use]
    pub fn supervisor(&self, id: SupervisorId) -> &Supervisor {
        &self.supervisors[id.index()]
    }

    #[must_use]
    pub fn program_tag(&self, id: ProgramId) -> &str {
        &self.programs[id.index()]
    }

    /// Student handles in ascending (lexicographic) order.
    pub fn student_ids(&self) -> impl Iterator<Item = StudentId> {
        (0..self.students.len() as u32).map(StudentId)
    }

    pub fn supervisor_ids(&self) -> impl Iterator<Item = SupervisorId> {
        (0..self.supervisors.len() as u32).map(SupervisorId)
    }

    pub fn topic_ids(&self) -> impl Iterator<Item = TopicId> {
        (0..self.topics.len() as u32).map(TopicId)
    }

    /// Sum of supervisor capacities, the hard ceiling on matched students.
    #[must_use]
    pub fn total_capacity(&self) -> u32 {
        self.supervisors.iter().map(|s| s.capacity).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ExpertiseLevel;

    fn tiny_instance() -> Instance {
        Instance {
            students: vec![Student {
                name: "BDBA001".to_string(),
                program: ProgramId(0),
                preferences: vec![TopicId(0)],
            }],
            topics: vec![Topic {
                name: "T01".to_string(),
                area: "Data Science".to_string(),
            }],
            supervisors: vec![Supervisor {
                name: "SUP01".to_string(),
                capacity: 3,
                entries: vec![crate::core::supervisor::ExpertiseEntry {
                    program: ProgramId(0),
                    topic: TopicId(0),
                    level: ExpertiseLevel::Expert,
                }],
            }],
            programs: vec!["BDBA".to_string()],
        }
    }

    #[test]
    fn test_accessors() {
        let instance = tiny_instance();
        assert_eq!(instance.student(StudentId(0)).name, "BDBA001");
        assert_eq!(instance.topic(TopicId(0)).area, "Data Science");
        assert_eq!(instance.supervisor(SupervisorId(0)).capacity, 3);
        assert_eq!(instance.program_tag(ProgramId(0)), "BDBA");
    }

    #[test]
    fn test_total_capacity() {
        assert_eq!(tiny_instance().total_capacity(), 3);
    }
}
