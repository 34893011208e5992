//! Solve command - run the matcher and write the allocation report.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::catalog::OwnershipCatalog;
use crate::cli::{print_validation_errors, OutputFormat};
use crate::core::instance::Instance;
use crate::evaluation::AllocationReport;
use crate::matching::engine::MatchEngine;
use crate::parsing::validate::{build_instance, ValidatorConfig};

/// Arguments for the solve command
#[derive(Args)]
pub struct SolveArgs {
    /// Students file: `StudentId: Topic1, Topic2, ...`
    #[arg(long)]
    pub students: PathBuf,

    /// Topics file: `TopicId: Area`
    #[arg(long)]
    pub topics: PathBuf,

    /// Supervisors file: `SupervisorId: Capacity, Bachelor:Topic:Level, ...`
    #[arg(long)]
    pub supervisors: PathBuf,

    /// Where to write the JSON report
    #[arg(short, long)]
    pub output: PathBuf,

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

/// Execute the solve command.
///
/// # Errors
///
/// Returns an error if the inputs cannot be read, fail validation, or the
/// report cannot be written. Unmatched students are not an error.
pub fn run(args: SolveArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
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

    let instance = match build_instance(
        &students_text,
        &topics_text,
        &supervisors_text,
        &resolver,
        &config,
    ) {
        Ok(instance) => instance,
        Err(failure) => {
            print_validation_errors(&failure, format);
            anyhow::bail!("{failure}");
        }
    };

    if verbose {
        eprintln!(
            "Validated {} students, {} topics, {} supervisors ({} programs)",
            instance.students.len(),
            instance.topics.len(),
            instance.supervisors.len(),
            instance.programs.len(),
        );
    }

    let catalog = OwnershipCatalog::build(&instance);
    let outcome = MatchEngine::new(&instance, &catalog).run();
    let report = AllocationReport::build(&instance, &catalog, &outcome);

    let json = report.to_json()?;
    fs::write(&args.output, format!("{json}\n"))
        .with_context(|| format!("failed to write report to {}", args.output.display()))?;

    match format {
        OutputFormat::Text => print_text_summary(&instance, &report, &args.output),
        OutputFormat::Json => println!("{json}"),
        OutputFormat::Tsv => print_tsv_assignments(&report),
    }

    Ok(())
}

fn print_text_summary(instance: &Instance, report: &AllocationReport, output: &std::path::Path) {
    let efficiency = &report.efficiency;
    println!(
        "\nAllocation: {}/{} students matched ({:.1}%)",
        efficiency.matched_students,
        efficiency.total_students,
        efficiency.match_rate * 100.0,
    );

    if let Some(average_rank) = report.satisfaction.average_rank {
        println!("   Average rank: {average_rank:.2} (1 = first choice)");
    }

    let stability = &report.stability;
    if stability.is_stable {
        println!("   Stability: stable (no blocking pairs)");
    } else {
        println!(
            "   Stability: UNSTABLE ({} blocking pairs)",
            stability.blocking_pairs
        );
    }

    let evictions: usize = report.rounds.iter().map(|r| r.evictions).sum();
    println!(
        "   Rounds: {} ({} evictions)",
        report.rounds.len(),
        evictions
    );

    // Capacity analysis: an undersized supervisor pool explains most
    // unmatched students before any diagnostics are read.
    let total_capacity = instance.total_capacity() as usize;
    println!(
        "   Supervisor capacity: {} slots for {} students",
        total_capacity, efficiency.total_students,
    );
    if total_capacity < efficiency.total_students {
        println!(
            "   WARNING: total supervisor capacity ({}) is below the number of students ({})",
            total_capacity, efficiency.total_students,
        );
    }

    if !report.unmatched.is_empty() {
        println!("\n   Unmatched students:");
        for row in &report.unmatched {
            println!("   - {} ({}): {}", row.student, row.program, row.reason);
        }
    }

    if !report.constraints.all_satisfied {
        println!("\n   CONSTRAINT VIOLATIONS:");
        for violation in &report.constraints.violations {
            println!("   - {violation}");
        }
    }

    println!("\nReport written to {}", output.display());
}

fn print_tsv_assignments(report: &AllocationReport) {
    println!("student\tprogram\ttopic\tarea\tsupervisor\texpertise\trank\tround");
    for row in &report.assignments {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            row.student,
            row.program,
            row.topic.as_deref().unwrap_or(""),
            row.area.as_deref().unwrap_or(""),
            row.supervisor.as_deref().unwrap_or(""),
            row.expertise.map(|e| e.as_str()).unwrap_or(""),
            row.rank.map_or(String::new(), |r| r.to_string()),
            row.round.map_or(String::new(), |r| r.to_string()),
        );
    }
}
