//! Diagnostic events and unmatched-student classification.

use serde::Serialize;

use crate::catalog::OwnershipCatalog;
use crate::core::instance::Instance;
use crate::core::types::{StudentId, StudentStatus, SupervisorId, TopicId};
use crate::matching::engine::MatchOutcome;

/// Non-fatal event recorded by the engine while matching.
///
/// Events are appended in the order they occur, which makes the log itself
/// deterministic and replayable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticEvent {
    /// A preference was skipped because nobody supervises the combination.
    NoSupervisorForCombination { student: StudentId, topic: TopicId },
    /// A proposal was rejected with the owner at capacity and the proposer
    /// worst under the derived order.
    AllSupervisorsAtCapacity { student: StudentId, topic: TopicId },
    /// A held assignment was lost to a better proposer.
    EvictedInRound {
        student: StudentId,
        topic: TopicId,
        round: u32,
    },
}

/// Why one preference of an unmatched student did not work out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PreferenceOutcome {
    /// No supervisor declared this (topic, program) combination.
    NoOwner,
    /// The owner finished the run with every slot taken.
    OwnerAtCapacity { supervisor: SupervisorId },
}

/// Primary failure cause of an unmatched student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchedReason {
    /// Every preference lacked an owner.
    NoSupervisorForCombination,
    /// Every feasible preference's owner ended the run full.
    AllSupervisorsAtCapacity,
    /// Some preferences lacked owners, the rest hit full supervisors.
    Mixed,
}

/// Classification of one unmatched student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmatchedAnalysis {
    pub student: StudentId,
    pub reason: UnmatchedReason,
    /// One outcome per preference, in list order.
    pub outcomes: Vec<(TopicId, PreferenceOutcome)>,
}

/// Classify every unmatched student by walking their preference list against
/// the final state. Returns entries in ascending student id order.
#[must_use]
pub fn classify_unmatched(
    instance: &Instance,
    catalog: &OwnershipCatalog,
    outcome: &MatchOutcome,
) -> Vec<UnmatchedAnalysis> {
    let mut analyses = Vec::new();

    for student in instance.student_ids() {
        if outcome.status[student.index()] == StudentStatus::Matched {
            continue;
        }

        let record = instance.student(student);
        let mut outcomes = Vec::with_capacity(record.preferences.len());
        let mut feasible = 0usize;

        for &topic in &record.preferences {
            let result = match catalog.owner(topic, record.program) {
                None => PreferenceOutcome::NoOwner,
                Some(ownership) => {
                    feasible += 1;
                    // An exhausted student proposed every feasible preference
                    // and lost the slot each time; the owner can only be full.
                    PreferenceOutcome::OwnerAtCapacity {
                        supervisor: ownership.supervisor,
                    }
                }
            };
            outcomes.push((topic, result));
        }

        let reason = if feasible == 0 {
            UnmatchedReason::NoSupervisorForCombination
        } else if feasible == outcomes.len() {
            UnmatchedReason::AllSupervisorsAtCapacity
        } else {
            UnmatchedReason::Mixed
        };

        analyses.push(UnmatchedAnalysis {
            student,
            reason,
            outcomes,
        });
    }

    analyses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProgramResolver;
    use crate::matching::engine::MatchEngine;
    use crate::parsing::validate::{build_instance, ValidatorConfig};

    fn run(students: &str, topics: &str, supervisors: &str) -> (Instance, OwnershipCatalog, MatchOutcome) {
        let instance = build_instance(
            students,
            topics,
            supervisors,
            &ProgramResolver::default(),
            &ValidatorConfig::default(),
        )
        .unwrap();
        let catalog = OwnershipCatalog::build(&instance);
        let outcome = MatchEngine::new(&instance, &catalog).run();
        (instance, catalog, outcome)
    }

    #[test]
    fn test_all_preferences_ownerless() {
        // BCSAI student, but every topic is only supervised for BDBA.
        let (instance, catalog, outcome) = run(
            "BCSAI001: T01, T02\n",
            "T01: A\nT02: A\n",
            "SUP01: 5, BDBA:T01:Expert, BDBA:T02:Expert\n",
        );

        let analyses = classify_unmatched(&instance, &catalog, &outcome);
        assert_eq!(analyses.len(), 1);
        assert_eq!(analyses[0].reason, UnmatchedReason::NoSupervisorForCombination);
        assert!(analyses[0]
            .outcomes
            .iter()
            .all(|(_, o)| *o == PreferenceOutcome::NoOwner));
    }

    #[test]
    fn test_all_feasible_but_full() {
        // Capacity 1, two students chasing the same single topic.
        let (instance, catalog, outcome) = run(
            "BDBA001: T01\nBDBA002: T01\n",
            "T01: A\n",
            "SUP01: 1, BDBA:T01:Expert\n",
        );

        let analyses = classify_unmatched(&instance, &catalog, &outcome);
        assert_eq!(analyses.len(), 1);
        assert_eq!(instance.student(analyses[0].student).name, "BDBA002");
        assert_eq!(analyses[0].reason, UnmatchedReason::AllSupervisorsAtCapacity);
    }

    #[test]
    fn test_mixed_reasons() {
        // T01 has no owner for BCSAI; T02 does but is taken by BCSAI001.
        let (instance, catalog, outcome) = run(
            "BCSAI001: T02\nBCSAI002: T01, T02\n",
            "T01: A\nT02: A\n",
            "SUP01: 1, BCSAI:T02:Expert\n",
        );

        let analyses = classify_unmatched(&instance, &catalog, &outcome);
        assert_eq!(analyses.len(), 1);
        assert_eq!(instance.student(analyses[0].student).name, "BCSAI002");
        assert_eq!(analyses[0].reason, UnmatchedReason::Mixed);
        assert_eq!(analyses[0].outcomes[0].1, PreferenceOutcome::NoOwner);
        assert!(matches!(
            analyses[0].outcomes[1].1,
            PreferenceOutcome::OwnerAtCapacity { .. }
        ));
    }

    #[test]
    fn test_matched_students_not_classified() {
        let (instance, catalog, outcome) = run(
            "BDBA001: T01\n",
            "T01: A\n",
            "SUP01: 5, BDBA:T01:Expert\n",
        );

        assert!(classify_unmatched(&instance, &catalog, &outcome).is_empty());
    }
}
