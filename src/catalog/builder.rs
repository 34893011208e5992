//! Derivation of topic ownership from supervisor expertise declarations.

use serde::{Deserialize, Serialize};

use crate::core::instance::Instance;
use crate::core::types::{ExpertiseLevel, ProgramId, SupervisorId, TopicId};

/// The supervisor chosen for one (topic, program) combination, with the
/// expertise level that won the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ownership {
    pub supervisor: SupervisorId,
    pub level: ExpertiseLevel,
}

/// The effective (topic, program) → supervisor mapping.
///
/// For each combination declared by at least one supervisor, the owner is the
/// supervisor with the highest expertise level; ties go to the
/// lexicographically smallest supervisor id. Combinations nobody declared
/// have no owner, and a student preference pointing at one is infeasible.
///
/// Storage is a dense topic-major table, so `owner()` is two index
/// computations in the engine's inner loop.
#[derive(Debug, Clone)]
pub struct OwnershipCatalog {
    programs: usize,
    owners: Vec<Option<Ownership>>,
}

impl OwnershipCatalog {
    /// Derive the catalog from a validated instance.
    #[must_use]
    pub fn build(instance: &Instance) -> Self {
        let programs = instance.programs.len();
        let mut owners = vec![None; instance.topics.len() * programs];

        // Supervisors are interned in ascending id order, so on equal levels
        // the first writer is the lexicographically smallest id and wins.
        for (index, supervisor) in instance.supervisors.iter().enumerate() {
            let id = SupervisorId(index as u32);
            for entry in &supervisor.entries {
                let slot: &mut Option<Ownership> =
                    &mut owners[entry.topic.index() * programs + entry.program.index()];
                let replace = match slot {
                    None => true,
                    Some(current) => entry.level > current.level,
                };
                if replace {
                    *slot = Some(Ownership {
                        supervisor: id,
                        level: entry.level,
                    });
                }
            }
        }

        Self { programs, owners }
    }

    /// Owning supervisor for a (topic, program) combination, if any.
    #[must_use]
    pub fn owner(&self, topic: TopicId, program: ProgramId) -> Option<Ownership> {
        self.owners[topic.index() * self.programs + program.index()]
    }

    /// Whether a preference for `topic` is feasible for a `program` student.
    #[must_use]
    pub fn is_feasible(&self, topic: TopicId, program: ProgramId) -> bool {
        self.owner(topic, program).is_some()
    }

    /// All (topic, program) combinations owned by `supervisor`.
    #[must_use]
    pub fn topics_of(&self, supervisor: SupervisorId) -> Vec<(TopicId, ProgramId)> {
        self.entries()
            .filter(|(_, _, ownership)| ownership.supervisor == supervisor)
            .map(|(topic, program, _)| (topic, program))
            .collect()
    }

    /// All owned combinations in (topic, program) order.
    pub fn entries(&self) -> impl Iterator<Item = (TopicId, ProgramId, Ownership)> + '_ {
        let programs = self.programs;
        self.owners.iter().enumerate().filter_map(move |(i, slot)| {
            slot.map(|ownership| {
                (
                    TopicId((i / programs) as u32),
                    ProgramId((i % programs) as u32),
                    ownership,
                )
            })
        })
    }
}
