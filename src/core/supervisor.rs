use serde::{Deserialize, Serialize};

use crate::core::types::{ExpertiseLevel, ProgramId, TopicId};

/// Inclusive bounds for a supervisor's capacity.
pub const MIN_CAPACITY: u32 = 1;
pub const MAX_CAPACITY: u32 = 10;

/// One declared (bachelor, topic, level) combination of a supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpertiseEntry {
    pub program: ProgramId,
    pub topic: TopicId,
    pub level: ExpertiseLevel,
}

/// A supervisor with a global capacity across all owned topics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supervisor {
    /// Raw supervisor id as it appeared in the input.
    pub name: String,

    /// Maximum number of students across all topics, in
    /// `[MIN_CAPACITY, MAX_CAPACITY]`.
    pub capacity: u32,

    /// Declared expertise, non-empty; (program, topic) pairs are distinct.
    pub entries: Vec<ExpertiseEntry>,
}
