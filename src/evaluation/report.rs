use serde::Serialize;

use crate::catalog::OwnershipCatalog;
use crate::core::instance::Instance;
use crate::core::types::ExpertiseLevel;
use crate::evaluation::metrics::{
    verify_constraints, ConstraintCheck, EfficiencyStats, FairnessStats, SatisfactionStats,
};
use crate::matching::diagnosis::{
    classify_unmatched, DiagnosticEvent, PreferenceOutcome, UnmatchedReason,
};
use crate::matching::engine::{MatchOutcome, RoundStats};
use crate::matching::stability::find_blocking_pairs;

/// One row of the assignment table. Optional columns are `None` for
/// unmatched students.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentRow {
    pub student: String,
    pub program: String,
    pub topic: Option<String>,
    pub area: Option<String>,
    pub supervisor: Option<String>,
    /// The owning supervisor's expertise level for the assigned combination.
    pub expertise: Option<ExpertiseLevel>,
    /// 1-based rank of the assigned topic in the student's list.
    pub rank: Option<u32>,
    /// Round in which the surviving assignment was made.
    pub round: Option<u32>,
}

/// One engine event, resolved to names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticRow {
    pub student: String,
    pub reason: &'static str,
    pub details: String,
}

/// One unmatched student with the classified failure cause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnmatchedRow {
    pub student: String,
    pub program: String,
    pub reason: &'static str,
    /// Per-preference explanation, in list order.
    pub details: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockingPairRow {
    pub student: String,
    pub topic: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StabilityBlock {
    pub is_stable: bool,
    pub blocking_pairs: usize,
    /// 1.0 when stable, shrinking with the share of blocking candidates.
    pub stability_score: f64,
    pub pairs: Vec<BlockingPairRow>,
}

/// Match quality grouped by bachelor program.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramSummary {
    pub program: String,
    pub total_students: usize,
    pub matched: usize,
    pub match_rate: f64,
    pub average_rank: Option<f64>,
}

/// The full structured report consumed by the CLI and external tools.
///
/// Everything here is derived deterministically from the instance and the
/// engine outcome; serializing the report twice for the same input yields
/// identical bytes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationReport {
    pub assignments: Vec<AssignmentRow>,
    pub diagnostics: Vec<DiagnosticRow>,
    pub unmatched: Vec<UnmatchedRow>,
    pub stability: StabilityBlock,
    pub satisfaction: SatisfactionStats,
    pub efficiency: EfficiencyStats,
    pub fairness: FairnessStats,
    pub constraints: ConstraintCheck,
    pub rounds: Vec<RoundStats>,
    pub programs: Vec<ProgramSummary>,
}

impl AllocationReport {
    /// Assemble the report from a finished matching session.
    #[must_use]
    pub fn build(
        instance: &Instance,
        catalog: &OwnershipCatalog,
        outcome: &MatchOutcome,
    ) -> Self {
        Self {
            assignments: assignment_rows(instance, catalog, outcome),
            diagnostics: diagnostic_rows(instance, outcome),
            unmatched: unmatched_rows(instance, catalog, outcome),
            stability: stability_block(instance, catalog, outcome),
            satisfaction: SatisfactionStats::compute(instance, outcome),
            efficiency: EfficiencyStats::compute(instance, outcome),
            fairness: FairnessStats::compute(instance, outcome),
            constraints: verify_constraints(instance, catalog, outcome),
            rounds: outcome.rounds.clone(),
            programs: program_summaries(instance, outcome),
        }
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json` error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn assignment_rows(
    instance: &Instance,
    catalog: &OwnershipCatalog,
    outcome: &MatchOutcome,
) -> Vec<AssignmentRow> {
    instance
        .student_ids()
        .map(|student| {
            let record = instance.student(student);
            let program = instance.program_tag(record.program).to_string();

            match outcome.assignment_of(student) {
                Some(topic) => {
                    let ownership = catalog
                        .owner(topic, record.program)
                        .expect("assignments always point at owned combinations");
                    let rank = record
                        .rank_of(topic)
                        .expect("assignments always come from the preference list")
                        as u32
                        + 1;
                    AssignmentRow {
                        student: record.name.clone(),
                        program,
                        topic: Some(instance.topic(topic).name.clone()),
                        area: Some(instance.topic(topic).area.clone()),
                        supervisor: Some(instance.supervisor(ownership.supervisor).name.clone()),
                        expertise: Some(ownership.level),
                        rank: Some(rank),
                        round: outcome.matched_round[student.index()],
                    }
                }
                None => AssignmentRow {
                    student: record.name.clone(),
                    program,
                    topic: None,
                    area: None,
                    supervisor: None,
                    expertise: None,
                    rank: None,
                    round: None,
                },
            }
        })
        .collect()
}

fn diagnostic_rows(instance: &Instance, outcome: &MatchOutcome) -> Vec<DiagnosticRow> {
    outcome
        .events
        .iter()
        .map(|event| match *event {
            DiagnosticEvent::NoSupervisorForCombination { student, topic } => {
                let record = instance.student(student);
                DiagnosticRow {
                    student: record.name.clone(),
                    reason: "no_supervisor_for_combination",
                    details: format!(
                        "no supervisor declares ({}, {})",
                        instance.topic(topic).name,
                        instance.program_tag(record.program)
                    ),
                }
            }
            DiagnosticEvent::AllSupervisorsAtCapacity { student, topic } => DiagnosticRow {
                student: instance.student(student).name.clone(),
                reason: "all_supervisors_at_capacity",
                details: format!(
                    "owner of {} had no free slot",
                    instance.topic(topic).name
                ),
            },
            DiagnosticEvent::EvictedInRound {
                student,
                topic,
                round,
            } => DiagnosticRow {
                student: instance.student(student).name.clone(),
                reason: "evicted_in_round",
                details: format!(
                    "lost {} in round {round}",
                    instance.topic(topic).name
                ),
            },
        })
        .collect()
}

fn unmatched_rows(
    instance: &Instance,
    catalog: &OwnershipCatalog,
    outcome: &MatchOutcome,
) -> Vec<UnmatchedRow> {
    classify_unmatched(instance, catalog, outcome)
        .into_iter()
        .map(|analysis| {
            let record = instance.student(analysis.student);
            let details = analysis
                .outcomes
                .iter()
                .map(|&(topic, result)| match result {
                    PreferenceOutcome::NoOwner => format!(
                        "{}: no supervisor for {} students",
                        instance.topic(topic).name,
                        instance.program_tag(record.program)
                    ),
                    PreferenceOutcome::OwnerAtCapacity { supervisor } => {
                        let owner = instance.supervisor(supervisor);
                        format!(
                            "{}: supervisor {} at capacity ({}/{})",
                            instance.topic(topic).name,
                            owner.name,
                            outcome.load[supervisor.index()],
                            owner.capacity
                        )
                    }
                })
                .collect();

            UnmatchedRow {
                student: record.name.clone(),
                program: instance.program_tag(record.program).to_string(),
                reason: match analysis.reason {
                    UnmatchedReason::NoSupervisorForCombination => "no_supervisor_for_combination",
                    UnmatchedReason::AllSupervisorsAtCapacity => "all_supervisors_at_capacity",
                    UnmatchedReason::Mixed => "mixed",
                },
                details,
            }
        })
        .collect()
}

fn stability_block(
    instance: &Instance,
    catalog: &OwnershipCatalog,
    outcome: &MatchOutcome,
) -> StabilityBlock {
    let report = find_blocking_pairs(instance, catalog, outcome);
    StabilityBlock {
        is_stable: report.is_stable(),
        blocking_pairs: report.blocking_pairs.len(),
        stability_score: report.score(),
        pairs: report
            .blocking_pairs
            .iter()
            .map(|pair| BlockingPairRow {
                student: instance.student(pair.student).name.clone(),
                topic: instance.topic(pair.topic).name.clone(),
            })
            .collect(),
    }
}

#[allow(clippy::cast_precision_loss)]
fn program_summaries(instance: &Instance, outcome: &MatchOutcome) -> Vec<ProgramSummary> {
    instance
        .programs
        .iter()
        .enumerate()
        .filter_map(|(index, tag)| {
            let members: Vec<_> = instance
                .student_ids()
                .filter(|&s| instance.student(s).program.index() == index)
                .collect();
            if members.is_empty() {
                // Programs that only occur in supervisor entries have no
                // students to summarize.
                return None;
            }

            let mut matched = 0usize;
            let mut rank_sum = 0u32;
            for &student in &members {
                if let Some(topic) = outcome.assignment_of(student) {
                    matched += 1;
                    rank_sum += instance
                        .student(student)
                        .rank_of(topic)
                        .expect("assignments always come from the preference list")
                        as u32
                        + 1;
                }
            }

            Some(ProgramSummary {
                program: tag.clone(),
                total_students: members.len(),
                matched,
                match_rate: matched as f64 / members.len() as f64,
                average_rank: (matched > 0).then(|| f64::from(rank_sum) / matched as f64),
            })
        })
        .collect()
}
