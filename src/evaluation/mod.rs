//! Post-matching evaluation: metrics and the structured report.
//!
//! - [`metrics`]: satisfaction, efficiency, fairness and constraint
//!   verification over a finished matching
//! - [`report::AllocationReport`]: the full payload consumed by the CLI and
//!   any external tooling: assignment table, diagnostics, unmatched
//!   analysis, stability block, metrics, round log and per-program summary
//!
//! All evaluation is read-only over the engine's outcome; nothing here
//! mutates matching state. The report carries no timestamps or other
//! environment-dependent data, so serializing it is as deterministic as the
//! engine itself.

pub mod metrics;
pub mod report;

pub use report::AllocationReport;
