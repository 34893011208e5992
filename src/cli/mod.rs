//! Command-line interface for spa-solver.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **solve**: Run the matcher over the three input files and write the
//!   JSON report
//! - **check**: Parse and validate the input files without matching
//! - **catalog**: Show the derived (topic, program) → supervisor ownership
//!   table
//!
//! ## Usage
//!
//! ```text
//! # Run the matcher
//! spa-solver solve --students students.txt --topics topics.txt \
//!     --supervisors supervisors.txt --output report.json
//!
//! # Enforce exactly five preferences per student
//! spa-solver solve --strict --students ... --topics ... --supervisors ... -o report.json
//!
//! # Validate input without matching
//! spa-solver check --students students.txt --topics topics.txt --supervisors supervisors.txt
//!
//! # Inspect who ends up owning which topic, as TSV
//! spa-solver catalog --topics topics.txt --supervisors supervisors.txt --format tsv
//! ```
//!
//! Exit code is 0 on a successful run (unmatched students are a reported
//! outcome, not an error) and non-zero when validation fails.

use clap::{Parser, Subcommand};

use crate::catalog::ProgramResolver;
use crate::parsing::error::ValidationErrors;

pub mod catalog;
pub mod check;
pub mod solve;

#[derive(Parser)]
#[command(name = "spa-solver")]
#[command(version)]
#[command(about = "Allocate students to thesis topics under supervisor capacities")]
#[command(
    long_about = "spa-solver assigns every student to at most one thesis topic, following the students' own preference order while respecting each supervisor's global capacity.\n\nTopics are owned by the supervisor with the highest declared expertise for the student's bachelor program. The matcher runs deterministic proposal rounds and produces a structured report with the assignment table, diagnostics for unmatched students, stability and fairness metrics, and a round-by-round log."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the matcher and write the allocation report
    Solve(solve::SolveArgs),

    /// Validate the input files without matching
    Check(check::CheckArgs),

    /// Show the derived topic ownership table
    Catalog(catalog::CatalogArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Build the program resolver from the repeatable CLI options.
///
/// `aliases` entries have the shape `PREFIX=TAG`, mapping a foreign id
/// prefix onto a program tag.
pub(crate) fn build_resolver(
    prefixes: &[String],
    aliases: &[String],
) -> anyhow::Result<ProgramResolver> {
    let mut resolver = ProgramResolver::default();
    for tag in prefixes {
        resolver.register(tag);
    }
    for alias in aliases {
        let Some((prefix, tag)) = alias.split_once('=') else {
            anyhow::bail!("invalid --program-alias '{alias}', expected PREFIX=TAG");
        };
        resolver.register_alias(prefix.trim(), tag.trim());
    }
    Ok(resolver)
}

/// Print accumulated validation errors to stderr in the selected format.
pub(crate) fn print_validation_errors(failure: &ValidationErrors, format: OutputFormat) {
    match format {
        OutputFormat::Text | OutputFormat::Tsv => {
            for error in &failure.errors {
                eprintln!("{error}");
            }
        }
        OutputFormat::Json => {
            let rows: Vec<serde_json::Value> = failure
                .errors
                .iter()
                .map(|error| {
                    serde_json::json!({
                        "stream": error.stream.to_string(),
                        "line": error.line,
                        "kind": error.kind.tag(),
                        "message": error.kind.to_string(),
                    })
                })
                .collect();
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&rows).unwrap_or_default()
            );
        }
    }
}
