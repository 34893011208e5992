//! The round-based matching engine and its post-run analyses.
//!
//! - [`engine::MatchEngine`]: iterated proposal/accept/evict procedure over a
//!   validated instance and its ownership catalog
//! - [`stability::find_blocking_pairs`]: blocking-pair detection over the
//!   finished matching
//! - [`diagnosis`]: diagnostic events and unmatched-student classification
//!
//! ## Algorithm
//!
//! The engine runs sequential rounds. Each round is one pass over the
//! students that are unmatched but still have untried preferences, in
//! ascending student id order. A student proposes to their next preference;
//! the cursor advances whether or not the proposal succeeds, so no
//! preference is ever proposed twice. The owning supervisor accepts while
//! below capacity; at capacity, the worst of the current holders plus the
//! proposer, under the derived order below, loses the slot. An evicted
//! student keeps their cursor and re-proposes from there in the next round.
//!
//! ## Derived supervisor order
//!
//! Supervisors have no explicit preference lists; their order over students
//! is derived, better first:
//!
//! 1. higher expertise level of the supervisor for the (topic, program) the
//!    student is holding or proposing,
//! 2. lower rank of that topic in the student's own preference list,
//! 3. lexicographically smaller student id.
//!
//! The same order drives eviction and the blocking-pair check, which is what
//! makes the produced matching stable.
//!
//! The engine is a pure function of its input: no I/O, no clock, no
//! randomness. Re-running it on the same instance yields an identical
//! outcome, diagnostics included.

pub mod diagnosis;
pub mod engine;
pub mod stability;

use std::cmp::Reverse;

use crate::catalog::OwnershipCatalog;
use crate::core::instance::Instance;
use crate::core::types::{ExpertiseLevel, StudentId, TopicId};

/// Comparison key for the derived supervisor order; smaller is better.
///
/// # Panics
///
/// Panics if `topic` is not in the student's preference list or the
/// combination has no owner; callers only evaluate feasible proposals.
#[must_use]
pub fn derived_key(
    instance: &Instance,
    catalog: &OwnershipCatalog,
    student: StudentId,
    topic: TopicId,
) -> (Reverse<ExpertiseLevel>, usize, u32) {
    let record = instance.student(student);
    let ownership = catalog
        .owner(topic, record.program)
        .expect("derived order is only defined for owned combinations");
    let rank = record
        .rank_of(topic)
        .expect("derived order is only defined over listed preferences");

    (Reverse(ownership.level), rank, student.0)
}
