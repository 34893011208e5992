//! Core data types for student-project allocation.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`student::Student`]: A student with an ordered topic preference list
//! - [`topic::Topic`]: A thesis topic with an informational area label
//! - [`supervisor::Supervisor`]: A supervisor with a global capacity and
//!   declared (bachelor, topic, level) expertise entries
//! - [`instance::Instance`]: The validated, interned input for one matching
//!   session
//! - [`types::ExpertiseLevel`], [`types::StudentStatus`]: Enumerations with
//!   the orderings the engine relies on
//!
//! ## Interned handles
//!
//! Raw string identifiers exist only at the parsing boundary. The validator
//! interns them into `u32`-backed handles ([`types::StudentId`],
//! [`types::TopicId`], [`types::SupervisorId`], [`types::ProgramId`]) with
//! each table sorted by raw id, which makes every downstream tie-break a
//! plain integer comparison and keeps the engine's state in dense vectors.

pub mod instance;
pub mod student;
pub mod supervisor;
pub mod topic;
pub mod types;
