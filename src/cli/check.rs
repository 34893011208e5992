//! Check command - validate the input files without running the matcher.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::{print_validation_errors, OutputFormat};
use crate::parsing::validate::{build_instance, ValidatorConfig};

/// Arguments for the check command
#[derive(Args)]
pub struct CheckArgs {
    /// Students file: `StudentId: Topic1, Topic2, ...`
    #[arg(long)]
    pub students: PathBuf,

    /// Topics file: `TopicId: Area`
    #[arg(long)]
    pub topics: PathBuf,

    /// Supervisors file: `SupervisorId: Capacity, Bachelor:Topic:Level, ...`
    #[arg(long)]
    pub supervisors: PathBuf,

    /// Require exactly 5 preferences per student instead of 1 to 5
    #[arg(long)]
    pub strict: bool,

    /// Extra program prefix for student-id inference (repeatable)
    #[arg(long = "program-prefix", value_name = "TAG")]
    pub program_prefixes: Vec<String>,

    /// Map a foreign id prefix to a program, e.g. `S=BDBA` (repeatable)
    #[arg(long = "program-alias", value_name = "PREFIX=TAG")]
    pub program_aliases: Vec<String>,
}

/// Execute the check command.
///
/// # Errors
///
/// Returns an error if the inputs cannot be read or fail validation.
pub fn run(args: CheckArgs, format: OutputFormat, _verbose: bool) -> anyhow::Result<()> {
    let students_text = fs::read_to_string(&args.students)
        .with_context(|| format!("failed to read students file {}", args.students.display()))?;
    let topics_text = fs::read_to_string(&args.topics)
        .with_context(|| format!("failed to read topics file {}", args.topics.display()))?;
    let supervisors_text = fs::read_to_string(&args.supervisors).with_context(|| {
        format!(
            "failed to read supervisors file {}",
            args.supervisors.display()
        )
    })?;

    let resolver = crate::cli::build_resolver(&args.program_prefixes, &args.program_aliases)?;
    let config = ValidatorConfig {
        strict_preferences: args.strict,
    };

    match build_instance(
        &students_text,
        &topics_text,
        &supervisors_text,
        &resolver,
        &config,
    ) {
        Ok(instance) => {
            match format {
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::json!({
                        "valid": true,
                        "students": instance.students.len(),
                        "topics": instance.topics.len(),
                        "supervisors": instance.supervisors.len(),
                        "programs": instance.programs,
                    })
                ),
                OutputFormat::Text | OutputFormat::Tsv => println!(
                    "OK: {} students, {} topics, {} supervisors, programs: {}",
                    instance.students.len(),
                    instance.topics.len(),
                    instance.supervisors.len(),
                    instance.programs.join(", "),
                ),
            }
            Ok(())
        }
        Err(failure) => {
            print_validation_errors(&failure, format);
            anyhow::bail!("{failure}");
        }
    }
}
