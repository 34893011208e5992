use serde::Serialize;
use tracing::debug;

use crate::catalog::OwnershipCatalog;
use crate::core::instance::Instance;
use crate::core::types::{StudentId, StudentStatus, SupervisorId, TopicId};
use crate::matching::derived_key;
use crate::matching::diagnosis::DiagnosticEvent;

/// Per-round progress counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoundStats {
    /// 1-based round number.
    pub round: u32,
    /// Students who gained an assignment during this round (gross count; an
    /// eviction elsewhere may have taken one away again).
    pub newly_matched: usize,
    /// Matched students at the end of the round.
    pub cumulative_matched: usize,
    /// Evictions performed during this round.
    pub evictions: usize,
}

/// Everything the engine produces for one matching session.
///
/// All per-student and per-supervisor vectors are indexed by handle.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    /// Final assignment, `None` for unmatched students.
    pub assignment: Vec<Option<TopicId>>,
    /// Final student count per supervisor.
    pub load: Vec<u32>,
    /// Final status; unmatched students are always `Exhausted` here.
    pub status: Vec<StudentStatus>,
    /// Round in which the surviving assignment was made.
    pub matched_round: Vec<Option<u32>>,
    /// Append-only event log in occurrence order.
    pub events: Vec<DiagnosticEvent>,
    /// One entry per executed round.
    pub rounds: Vec<RoundStats>,
}

impl MatchOutcome {
    #[must_use]
    pub fn assignment_of(&self, student: StudentId) -> Option<TopicId> {
        self.assignment[student.index()]
    }

    #[must_use]
    pub fn is_matched(&self, student: StudentId) -> bool {
        self.assignment[student.index()].is_some()
    }

    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.assignment.iter().filter(|a| a.is_some()).count()
    }
}

/// Mutable matching state, owned by the engine for the session's duration.
struct MatchState {
    assignment: Vec<Option<TopicId>>,
    load: Vec<u32>,
    /// Next preference index to propose, per student. Monotone.
    cursor: Vec<usize>,
    status: Vec<StudentStatus>,
    matched_round: Vec<Option<u32>>,
    /// Students currently counted against each supervisor's capacity.
    holders: Vec<Vec<StudentId>>,
}

impl MatchState {
    fn new(students: usize, supervisors: usize) -> Self {
        Self {
            assignment: vec![None; students],
            load: vec![0; supervisors],
            cursor: vec![0; students],
            status: vec![StudentStatus::Unproposed; students],
            matched_round: vec![None; students],
            holders: vec![Vec::new(); supervisors],
        }
    }
}

/// The iterated proposal engine.
///
/// Borrows the validated instance and the derived ownership catalog; owns no
/// I/O and no clock. [`run`](Self::run) is deterministic: identical inputs
/// produce identical outcomes, event logs and round statistics.
pub struct MatchEngine<'a> {
    instance: &'a Instance,
    catalog: &'a OwnershipCatalog,
}

impl<'a> MatchEngine<'a> {
    #[must_use]
    pub fn new(instance: &'a Instance, catalog: &'a OwnershipCatalog) -> Self {
        Self { instance, catalog }
    }

    /// Run rounds until every student is matched or exhausted.
    #[must_use]
    pub fn run(&self) -> MatchOutcome {
        let mut state = MatchState::new(
            self.instance.students.len(),
            self.instance.supervisors.len(),
        );
        let mut events = Vec::new();
        let mut rounds = Vec::new();
        let mut round = 0u32;

        loop {
            // Snapshot at round start: evicted students re-enter next round.
            let worklist: Vec<StudentId> = self
                .instance
                .student_ids()
                .filter(|s| state.status[s.index()] == StudentStatus::Unproposed)
                .collect();
            if worklist.is_empty() {
                break;
            }

            round += 1;
            let mut newly_matched = 0usize;
            let mut evictions = 0usize;

            for student in worklist {
                debug_assert_eq!(state.status[student.index()], StudentStatus::Unproposed);
                self.propose(
                    student,
                    round,
                    &mut state,
                    &mut events,
                    &mut newly_matched,
                    &mut evictions,
                );
            }

            let cumulative_matched = state
                .assignment
                .iter()
                .filter(|a| a.is_some())
                .count();
            debug!(round, newly_matched, cumulative_matched, evictions, "round finished");
            rounds.push(RoundStats {
                round,
                newly_matched,
                cumulative_matched,
                evictions,
            });

            self.debug_check_invariants(&state);
        }

        MatchOutcome {
            assignment: state.assignment,
            load: state.load,
            status: state.status,
            matched_round: state.matched_round,
            events,
            rounds,
        }
    }

    /// One student's turn: walk preferences from the cursor until matched,
    /// rejected at a full supervisor, or out of preferences. The cursor
    /// advances on every proposal, successful or not.
    fn propose(
        &self,
        student: StudentId,
        round: u32,
        state: &mut MatchState,
        events: &mut Vec<DiagnosticEvent>,
        newly_matched: &mut usize,
        evictions: &mut usize,
    ) {
        let record = self.instance.student(student);

        loop {
            let k = state.cursor[student.index()];
            if k == record.preferences.len() {
                state.status[student.index()] = StudentStatus::Exhausted;
                return;
            }

            let topic = record.preferences[k];
            state.cursor[student.index()] = k + 1;

            let Some(ownership) = self.catalog.owner(topic, record.program) else {
                events.push(DiagnosticEvent::NoSupervisorForCombination { student, topic });
                continue;
            };
            let supervisor = ownership.supervisor;
            let capacity = self.instance.supervisor(supervisor).capacity;

            if state.load[supervisor.index()] < capacity {
                self.accept(student, topic, supervisor, round, state);
                *newly_matched += 1;
                return;
            }

            // Full: the worst of holders + proposer loses the slot.
            let proposer_key = derived_key(self.instance, self.catalog, student, topic);
            let worst = state.holders[supervisor.index()]
                .iter()
                .map(|&held| {
                    let held_topic = state.assignment[held.index()]
                        .expect("holders always have an assignment");
                    (
                        derived_key(self.instance, self.catalog, held, held_topic),
                        held,
                    )
                })
                .max()
                .filter(|&(key, _)| key > proposer_key);

            let Some((_, victim)) = worst else {
                events.push(DiagnosticEvent::AllSupervisorsAtCapacity { student, topic });
                return;
            };

            let held_topic = self.evict(victim, supervisor, state);
            events.push(DiagnosticEvent::EvictedInRound {
                student: victim,
                topic: held_topic,
                round,
            });
            *evictions += 1;

            self.accept(student, topic, supervisor, round, state);
            *newly_matched += 1;
            return;
        }
    }

    fn accept(
        &self,
        student: StudentId,
        topic: TopicId,
        supervisor: SupervisorId,
        round: u32,
        state: &mut MatchState,
    ) {
        state.assignment[student.index()] = Some(topic);
        state.status[student.index()] = StudentStatus::Matched;
        state.matched_round[student.index()] = Some(round);
        state.load[supervisor.index()] += 1;
        state.holders[supervisor.index()].push(student);
    }

    /// Remove `victim` from `supervisor`, preserving their cursor so they
    /// resume from the next untried preference. Returns the lost topic.
    fn evict(
        &self,
        victim: StudentId,
        supervisor: SupervisorId,
        state: &mut MatchState,
    ) -> TopicId {
        let held_topic = state.assignment[victim.index()]
            .take()
            .expect("eviction victim always has an assignment");
        state.status[victim.index()] = StudentStatus::Unproposed;
        state.matched_round[victim.index()] = None;
        state.load[supervisor.index()] -= 1;
        let holders = &mut state.holders[supervisor.index()];
        let position = holders
            .iter()
            .position(|&s| s == victim)
            .expect("eviction victim is among the holders");
        holders.swap_remove(position);
        held_topic
    }

    /// Round-boundary invariant checks; violations are programmer errors.
    fn debug_check_invariants(&self, state: &MatchState) {
        if cfg!(debug_assertions) {
            for student in self.instance.student_ids() {
                let record = self.instance.student(student);
                let i = student.index();

                debug_assert!(state.cursor[i] <= record.preferences.len());
                match state.status[i] {
                    StudentStatus::Matched => {
                        let topic = state.assignment[i].expect("matched without assignment");
                        debug_assert!(record.rank_of(topic).is_some());
                        let ownership = self
                            .catalog
                            .owner(topic, record.program)
                            .expect("matched to an unowned combination");
                        debug_assert!(
                            state.holders[ownership.supervisor.index()].contains(&student)
                        );
                    }
                    StudentStatus::Unproposed => {
                        debug_assert!(state.assignment[i].is_none());
                    }
                    StudentStatus::Exhausted => {
                        debug_assert!(state.assignment[i].is_none());
                        debug_assert_eq!(state.cursor[i], record.preferences.len());
                    }
                }
            }
            for supervisor in self.instance.supervisor_ids() {
                let i = supervisor.index();
                debug_assert!(state.load[i] <= self.instance.supervisor(supervisor).capacity);
                debug_assert_eq!(state.load[i] as usize, state.holders[i].len());
            }
        }
    }
}
