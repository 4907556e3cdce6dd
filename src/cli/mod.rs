//! Command-line parsing for `synthc`.
//!
//! Argument parsing and dispatch stay here; constraint logic lives in the library.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::synth::{DEFAULT_SEED, InvalidRowPolicy};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "synthc", version, about = "Constraint checks and repairs for synthetic tabular data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Report which rows of a CSV violate the registered constraints.
    Check(CheckArgs),
    /// Apply every constraint's repair, in registration order, and write the result.
    Repair(RepairArgs),
    /// Fit the bootstrap sampler on a CSV and write repaired synthetic rows.
    Sample(SampleArgs),
}

/// Inputs shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// Dataset CSV (header row required).
    #[arg(short = 'd', long, value_name = "CSV")]
    pub data: PathBuf,

    /// Constraint registrations (JSON array), applied in file order.
    #[arg(short = 'c', long, value_name = "JSON")]
    pub constraints: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct CheckArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Offending rows to list per constraint.
    #[arg(long, default_value_t = 5)]
    pub examples: usize,
}

#[derive(Debug, Args, Clone)]
pub struct RepairArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output CSV (stdout if omitted).
    #[arg(short = 'o', long, value_name = "CSV")]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Number of synthetic rows to generate.
    #[arg(short = 'n', long, default_value_t = 100)]
    pub rows: usize,

    /// Random seed for the sampler.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Numeric jitter as a fraction of each column's standard deviation.
    #[arg(long, default_value_t = 0.05)]
    pub jitter: f64,

    /// What to do with training rows that violate a constraint.
    #[arg(long, value_enum, default_value_t = InvalidRowPolicy::Drop)]
    pub policy: InvalidRowPolicy,

    /// Output CSV (stdout if omitted).
    #[arg(short = 'o', long, value_name = "CSV")]
    pub out: Option<PathBuf>,
}
