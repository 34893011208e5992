//! Topic ownership derivation and program inference.
//!
//! Supervisors do not own topics directly in the input; they declare
//! (bachelor, topic, level) expertise entries. This module turns those
//! declarations into the effective catalog the matcher runs on:
//!
//! - [`programs::ProgramResolver`]: infers a student's bachelor program from
//!   the id prefix via a configurable table
//! - [`builder::OwnershipCatalog`]: picks one owning supervisor per declared
//!   (topic, program) combination: highest expertise level first, ties to
//!   the lexicographically smallest supervisor id
//!
//! A student preference is *feasible* when its (topic, program) combination
//! has an owner. Infeasible preferences stay in the list; the engine skips
//! them at proposal time and the diagnostics explain them.

pub mod builder;
pub mod programs;

pub use builder::{Ownership, OwnershipCatalog};
pub use programs::ProgramResolver;
