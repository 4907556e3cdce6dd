//! Shared workflows behind the CLI subcommands.
//!
//! load registrations -> build constraint set -> ingest CSV (constraint text
//! columns kept verbatim) -> check / repair / fit + sample
//!
//! The CLI layer only prints and writes what these functions return.

use crate::app::Inputs;
use crate::cli::InputArgs;
use crate::constraints::ConstraintSet;
use crate::domain::Dataset;
use crate::error::AppError;
use crate::io::{IngestOptions, read_constraint_specs, read_dataset_csv};
use crate::report::ValidityReport;
use crate::synth::{BootstrapConfig, ColumnBootstrap, ConstrainedSynthesizer, FitSummary, InvalidRowPolicy};

/// Outputs of a repair pass.
#[derive(Debug, Clone)]
pub struct RepairOutput {
    pub before: ValidityReport,
    pub after: ValidityReport,
    pub repaired: Dataset,
}

/// Outputs of a fit + sample run.
#[derive(Debug, Clone)]
pub struct SampleOutput {
    pub fit: FitSummary,
    pub sampled: Dataset,
    pub report: ValidityReport,
}

/// Load registrations and the dataset they apply to.
pub fn load_inputs(args: &InputArgs) -> Result<Inputs, AppError> {
    let specs = read_constraint_specs(&args.constraints)?;
    let constraints = ConstraintSet::from_specs(&specs)?;

    let options = IngestOptions {
        text_columns: constraints.text_columns(),
    };
    let data = read_dataset_csv(&args.data, &options)?;

    Ok(Inputs { data, constraints })
}

pub fn run_check(inputs: &Inputs) -> Result<ValidityReport, AppError> {
    Ok(ValidityReport::evaluate(&inputs.constraints, &inputs.data)?)
}

pub fn run_repair(inputs: Inputs) -> Result<RepairOutput, AppError> {
    let before = ValidityReport::evaluate(&inputs.constraints, &inputs.data)?;
    let repaired = inputs.constraints.reverse_transform(inputs.data)?;
    let after = ValidityReport::evaluate(&inputs.constraints, &repaired)?;

    Ok(RepairOutput {
        before,
        after,
        repaired,
    })
}

pub fn run_sample(
    inputs: Inputs,
    config: BootstrapConfig,
    policy: InvalidRowPolicy,
    rows: usize,
) -> Result<SampleOutput, AppError> {
    let model = ColumnBootstrap::new(config)?;
    let mut synth = ConstrainedSynthesizer::new(model, inputs.constraints).with_policy(policy);

    let fit = synth.fit(inputs.data)?;
    let sampled = synth.sample(rows)?;
    let report = ValidityReport::evaluate(synth.constraints(), &sampled)?;

    Ok(SampleOutput {
        fit,
        sampled,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::{IdentifierCategoryConsistency, RatioBoundConstraint};
    use crate::dataset;

    fn inputs() -> Inputs {
        let mut constraints = ConstraintSet::new();
        constraints.register(
            IdentifierCategoryConsistency::new(vec!["id".into(), "kind".into()]).unwrap(),
        );
        constraints.register(
            RatioBoundConstraint::new(vec!["salary".into(), "loan".into()], 1.5).unwrap(),
        );
        let data = dataset!(
            ["id", "kind", "salary", "loan"];
            ["A1", "primary", 100, 90],
            ["B1", "secondary", 50, 40],
            ["C2", "secondary", 80, 200],
            ["D1", "primary", 60, 30],
        )
        .unwrap();
        Inputs { data, constraints }
    }

    #[test]
    fn repair_clears_every_violation() {
        let out = run_repair(inputs()).unwrap();
        assert_eq!(out.before.invalid_rows(), 2);
        assert!(out.after.all_valid());
        assert_eq!(out.repaired.len(), 4);
    }

    #[test]
    fn sampled_rows_satisfy_every_constraint() {
        let out = run_sample(inputs(), BootstrapConfig::default(), InvalidRowPolicy::Keep, 200).unwrap();
        assert_eq!(out.fit.rows_used, 4);
        assert_eq!(out.sampled.len(), 200);
        assert!(out.report.all_valid());
    }
}
