//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads constraint registrations and the dataset
//! - runs check / repair / sample
//! - prints reports and writes CSV output

use std::path::Path;

use clap::Parser;

use crate::cli::{CheckArgs, Command, RepairArgs, SampleArgs};
use crate::constraints::ConstraintSet;
use crate::domain::Dataset;
use crate::error::AppError;
use crate::io::{write_dataset, write_dataset_csv};
use crate::report::{format_fit_summary, format_repair_summary, format_validity_report};
use crate::synth::BootstrapConfig;

pub mod pipeline;

/// A dataset and the constraints registered against it.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub data: Dataset,
    pub constraints: ConstraintSet,
}

/// Entry point for the `synthc` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Check(args) => handle_check(args),
        Command::Repair(args) => handle_repair(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn handle_check(args: CheckArgs) -> Result<(), AppError> {
    let inputs = pipeline::load_inputs(&args.input)?;
    let report = pipeline::run_check(&inputs)?;

    println!("{}", format_validity_report(&report, &inputs.data, args.examples));

    if !report.all_valid() {
        return Err(AppError::new(
            3,
            format!(
                "{} of {} rows violate a constraint.",
                report.invalid_rows(),
                report.rows
            ),
        ));
    }
    Ok(())
}

fn handle_repair(args: RepairArgs) -> Result<(), AppError> {
    let inputs = pipeline::load_inputs(&args.input)?;
    let out = pipeline::run_repair(inputs)?;

    emit_status(
        args.out.as_deref(),
        &format_repair_summary(&out.before, &out.after),
    );
    emit_dataset(args.out.as_deref(), &out.repaired)
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let inputs = pipeline::load_inputs(&args.input)?;
    let config = BootstrapConfig {
        seed: args.seed,
        jitter: args.jitter,
    };
    let out = pipeline::run_sample(inputs, config, args.policy, args.rows)?;

    if !out.report.all_valid() {
        return Err(AppError::new(
            4,
            format!(
                "{} sampled rows still violate a constraint after repair.",
                out.report.invalid_rows()
            ),
        ));
    }

    emit_status(args.out.as_deref(), &format_fit_summary(&out.fit));
    emit_dataset(args.out.as_deref(), &out.sampled)
}

/// Status goes to stderr when stdout carries the CSV.
fn emit_status(out: Option<&Path>, status: &str) {
    match out {
        Some(_) => print!("{status}"),
        None => eprint!("{status}"),
    }
}

fn emit_dataset(out: Option<&Path>, data: &Dataset) -> Result<(), AppError> {
    match out {
        Some(path) => {
            write_dataset_csv(path, data)?;
            println!("Wrote {} rows to {}", data.len(), path.display());
            Ok(())
        }
        None => write_dataset(std::io::stdout().lock(), data),
    }
}
