//! # spa-solver
//!
//! A library for allocating students to thesis topics under supervisor
//! capacity constraints.
//!
//! Students rank up to five topics; supervisors declare per-bachelor,
//! per-topic expertise and a global capacity. Topics themselves have no
//! capacity: a topic is owned, for each bachelor program, by the supervisor
//! with the highest declared expertise (ties to the lexicographically
//! smallest id), and only that owner's capacity binds.
//!
//! The matcher runs deterministic sequential proposal rounds in the style of
//! the SPA-student algorithm of Abraham, Irving and Manlove (2007): each
//! unmatched student proposes to their next untried preference, owners
//! accept while below capacity, and at capacity the worst of the holders and
//! the proposer (by expertise level, then the student's own rank, then id)
//! loses the slot. The result is a stable matching together with
//! diagnostics, quality metrics and a round-by-round log.
//!
//! ## Features
//!
//! - **Accumulating validation**: every syntax and semantic problem across
//!   the three input streams is reported in one pass
//! - **Derived ownership catalog**: expertise declarations become a
//!   deterministic (topic, program) → supervisor mapping
//! - **Stable matching**: proposal rounds with capacity-driven eviction
//! - **Diagnostics**: unmatched students are classified by failure cause
//! - **Evaluation**: satisfaction, utilization, fairness (Gini) and
//!   constraint verification in a serializable report
//!
//! ## Example
//!
//! ```rust
//! use spa_solver::catalog::{OwnershipCatalog, ProgramResolver};
//! use spa_solver::evaluation::AllocationReport;
//! use spa_solver::matching::engine::MatchEngine;
//! use spa_solver::parsing::validate::{build_instance, ValidatorConfig};
//!
//! let instance = build_instance(
//!     "BDBA001: T01, T02\n",
//!     "T01: Data Science\nT02: Machine Learning\n",
//!     "SUP01: 5, BDBA:T01:Expert, BDBA:T02:Advanced\n",
//!     &ProgramResolver::default(),
//!     &ValidatorConfig::default(),
//! )
//! .unwrap();
//!
//! let catalog = OwnershipCatalog::build(&instance);
//! let outcome = MatchEngine::new(&instance, &catalog).run();
//! let report = AllocationReport::build(&instance, &catalog, &outcome);
//!
//! assert_eq!(report.efficiency.matched_students, 1);
//! assert!(report.stability.is_stable);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Core data types for students, topics, supervisors and the
//!   validated instance
//! - [`parsing`]: Stream parsers and the accumulating validator
//! - [`catalog`]: Program inference and topic ownership derivation
//! - [`matching`]: The round-based engine, stability check and diagnostics
//! - [`evaluation`]: Metrics and the structured report
//! - [`cli`]: Command-line interface implementation

pub mod catalog;
pub mod cli;
pub mod core;
pub mod evaluation;
pub mod matching;
pub mod parsing;

// Re-export commonly used types for convenience
pub use catalog::{OwnershipCatalog, ProgramResolver};
pub use core::instance::Instance;
pub use core::types::{ExpertiseLevel, ProgramId, StudentId, SupervisorId, TopicId};
pub use evaluation::AllocationReport;
pub use matching::engine::{MatchEngine, MatchOutcome};
