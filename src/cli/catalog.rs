//! Catalog command - show the derived topic ownership table.
//!
//! Useful for inspecting who ends up owning a contested (topic, program)
//! combination before running the matcher.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::catalog::OwnershipCatalog;
use crate::cli::{print_validation_errors, OutputFormat};
use crate::parsing::validate::{build_instance, ValidatorConfig};

/// Arguments for the catalog command
#[derive(Args)]
pub struct CatalogArgs {
    /// Topics file: `TopicId: Area`
    #[arg(long)]
    pub topics: PathBuf,

    /// Supervisors file: `SupervisorId: Capacity, Bachelor:Topic:Level, ...`
    #[arg(long)]
    pub supervisors: PathBuf,

    /// Optional students file; when given, its program tags join the table
    #[arg(long)]
    pub students: Option<PathBuf>,

    /// Extra program prefix for student-id inference (repeatable)
    #[arg(long = "program-prefix", value_name = "TAG")]
    pub program_prefixes: Vec<String>,

    /// Map a foreign id prefix to a program, e.g. `S=BDBA` (repeatable)
    #[arg(long = "program-alias", value_name = "PREFIX=TAG")]
    pub program_aliases: Vec<String>,
}

/// Execute the catalog command.
///
/// # Errors
///
/// Returns an error if the inputs cannot be read or fail validation.
pub fn run(args: CatalogArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let topics_text = fs::read_to_string(&args.topics)
        .with_context(|| format!("failed to read topics file {}", args.topics.display()))?;
    let supervisors_text = fs::read_to_string(&args.supervisors).with_context(|| {
        format!(
            "failed to read supervisors file {}",
            args.supervisors.display()
        )
    })?;
    let students_text = match &args.students {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read students file {}", path.display()))?,
        None => String::new(),
    };

    let resolver = crate::cli::build_resolver(&args.program_prefixes, &args.program_aliases)?;

    let instance = match build_instance(
        &students_text,
        &topics_text,
        &supervisors_text,
        &resolver,
        &ValidatorConfig::default(),
    ) {
        Ok(instance) => instance,
        Err(failure) => {
            print_validation_errors(&failure, format);
            anyhow::bail!("{failure}");
        }
    };

    let catalog = OwnershipCatalog::build(&instance);
    let entries: Vec<_> = catalog.entries().collect();

    if verbose {
        eprintln!(
            "{} owned (topic, program) combinations across {} supervisors",
            entries.len(),
            instance.supervisors.len(),
        );
    }

    match format {
        OutputFormat::Text => {
            println!("topic  program  supervisor  level");
            for (topic, program, ownership) in &entries {
                println!(
                    "{}  {}  {}  {}",
                    instance.topic(*topic).name,
                    instance.program_tag(*program),
                    instance.supervisor(ownership.supervisor).name,
                    ownership.level,
                );
            }
        }
        OutputFormat::Tsv => {
            println!("topic\tprogram\tsupervisor\tlevel");
            for (topic, program, ownership) in &entries {
                println!(
                    "{}\t{}\t{}\t{}",
                    instance.topic(*topic).name,
                    instance.program_tag(*program),
                    instance.supervisor(ownership.supervisor).name,
                    ownership.level,
                );
            }
        }
        OutputFormat::Json => {
            let rows: Vec<serde_json::Value> = entries
                .iter()
                .map(|(topic, program, ownership)| {
                    serde_json::json!({
                        "topic": instance.topic(*topic).name,
                        "program": instance.program_tag(*program),
                        "supervisor": instance.supervisor(ownership.supervisor).name,
                        "level": ownership.level,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }

    Ok(())
}
