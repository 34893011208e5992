//! Blocking-pair detection over a finished matching.

use serde::Serialize;

use crate::catalog::OwnershipCatalog;
use crate::core::instance::Instance;
use crate::core::types::{StudentId, TopicId};
use crate::matching::derived_key;
use crate::matching::engine::MatchOutcome;

/// A (student, topic) pair that would rationally defect from the matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockingPair {
    pub student: StudentId,
    pub topic: TopicId,
}

/// Result of the stability scan.
#[derive(Debug, Clone, PartialEq)]
pub struct StabilityReport {
    /// All blocking pairs found; empty means the matching is stable.
    pub blocking_pairs: Vec<BlockingPair>,
    /// Candidate (student, topic) pairs examined.
    pub candidates_scanned: usize,
}

impl StabilityReport {
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.blocking_pairs.is_empty()
    }

    /// `1.0` for a stable matching, shrinking toward `0.0` as the share of
    /// scanned candidates that block grows.
    #[must_use]
    pub fn score(&self) -> f64 {
        if self.candidates_scanned == 0 {
            return 1.0;
        }
        #[allow(clippy::cast_precision_loss)]
        {
            1.0 - self.blocking_pairs.len() as f64 / self.candidates_scanned as f64
        }
    }
}

/// Enumerate blocking pairs.
///
/// A pair `(s, t)` blocks when all of the following hold:
///
/// 1. `s` strictly prefers `t` to their assignment (or is unmatched),
/// 2. the (t, program of s) combination has an owner `v`,
/// 3. `v` has spare capacity, or holds a student strictly worse than `s`
///    under the derived order.
///
/// The scan walks each student's preference prefix up to their assignment,
/// so a stable matching costs one pass over the preference lists.
#[must_use]
pub fn find_blocking_pairs(
    instance: &Instance,
    catalog: &OwnershipCatalog,
    outcome: &MatchOutcome,
) -> StabilityReport {
    // Rebuild holder sets from the final assignment.
    let mut holders: Vec<Vec<StudentId>> = vec![Vec::new(); instance.supervisors.len()];
    for student in instance.student_ids() {
        if let Some(topic) = outcome.assignment_of(student) {
            let ownership = catalog
                .owner(topic, instance.student(student).program)
                .expect("assignments always point at owned combinations");
            holders[ownership.supervisor.index()].push(student);
        }
    }

    let mut blocking_pairs = Vec::new();
    let mut candidates_scanned = 0usize;

    for student in instance.student_ids() {
        let record = instance.student(student);
        let limit = outcome
            .assignment_of(student)
            .and_then(|assigned| record.rank_of(assigned))
            .unwrap_or(record.preferences.len());

        for &topic in &record.preferences[..limit] {
            candidates_scanned += 1;

            let Some(ownership) = catalog.owner(topic, record.program) else {
                continue;
            };
            let supervisor = ownership.supervisor;
            let capacity = instance.supervisor(supervisor).capacity;

            let blocks = if outcome.load[supervisor.index()] < capacity {
                true
            } else {
                let proposer_key = derived_key(instance, catalog, student, topic);
                holders[supervisor.index()].iter().any(|&held| {
                    let held_topic = outcome.assignment_of(held)
                        .expect("holders always have an assignment");
                    derived_key(instance, catalog, held, held_topic) > proposer_key
                })
            };

            if blocks {
                blocking_pairs.push(BlockingPair { student, topic });
            }
        }
    }

    StabilityReport {
        blocking_pairs,
        candidates_scanned,
    }
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
    fn test_engine_output_is_stable() {
        let (instance, catalog, outcome) = run(
            "BDBA001: T01, T02, T03\nBDBA002: T01, T03, T02\nBCSAI001: T02, T01, T03\n",
            "T01: A\nT02: B\nT03: C\n",
            "SUP01: 1, BDBA:T01:Expert, BCSAI:T02:Advanced\nSUP02: 2, BDBA:T02:Expert, BDBA:T03:Advanced, BCSAI:T01:Expert, BCSAI:T03:Beginner\n",
        );

        let report = find_blocking_pairs(&instance, &catalog, &outcome);
        assert!(report.is_stable(), "unexpected blocking pairs: {:?}", report.blocking_pairs);
        assert!((report.score() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_matching_is_trivially_stable() {
        let (instance, catalog, outcome) =
            run("", "T01: A\n", "SUP01: 1, BDBA:T01:Expert\n");

        let report = find_blocking_pairs(&instance, &catalog, &outcome);
        assert!(report.is_stable());
        assert_eq!(report.candidates_scanned, 0);
        assert!((report.score() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unmatched_student_with_ownerless_preferences_not_blocking() {
        let (instance, catalog, outcome) = run(
            "BCSAI001: T01\n",
            "T01: A\n",
            "SUP01: 1, BDBA:T01:Expert\n",
        );

        let report = find_blocking_pairs(&instance, &catalog, &outcome);
        assert!(report.is_stable());
        assert_eq!(report.candidates_scanned, 1);
    }

    #[test]
    fn test_detects_planted_blocking_pair() {
        // Build a valid run, then corrupt the outcome: unassign the matched
        // student while leaving the supervisor's load at zero, so their top
        // preference has visible spare capacity.
        let (instance, catalog, mut outcome) = run(
            "BDBA001: T01\n",
            "T01: A\n",
            "SUP01: 1, BDBA:T01:Expert\n",
        );
        outcome.assignment[0] = None;
        outcome.load[0] = 0;

        let report = find_blocking_pairs(&instance, &catalog, &outcome);
        assert_eq!(report.blocking_pairs.len(), 1);
        assert!(report.score() < 1.0);
    }
}
