//! The synthesizer seam and the constraint-aware wrapper around it.
//!
//! A `Synthesizer` learns from a dataset and samples new rows. It knows nothing
//! about constraints. `ConstrainedSynthesizer` drives the constraint contract
//! around it:
//!
//! - `fit`: validate real rows, apply the invalid-row policy, `transform`, fit the model
//! - `sample`: draw rows from the model, then `reverse_transform` them in registration order

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::constraints::ConstraintSet;
use crate::domain::Dataset;
use crate::error::SynthError;
use crate::report::ValidityReport;

pub mod bootstrap;

pub use bootstrap::*;

/// A generative model over tabular data.
pub trait Synthesizer {
    fn fit(&mut self, data: &Dataset) -> Result<(), SynthError>;

    /// Draw `rows` synthetic rows with the header seen at fit time.
    fn sample(&mut self, rows: usize) -> Result<Dataset, SynthError>;
}

/// What to do with real rows that violate a registered constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InvalidRowPolicy {
    /// Train on every row.
    Keep,
    /// Train only on rows every constraint accepts.
    #[default]
    Drop,
    /// Refuse to fit if any row is invalid.
    Reject,
}

/// Outcome of `ConstrainedSynthesizer::fit`.
#[derive(Debug, Clone)]
pub struct FitSummary {
    pub rows_seen: usize,
    pub rows_used: usize,
    pub report: ValidityReport,
}

pub struct ConstrainedSynthesizer<S> {
    model: S,
    constraints: ConstraintSet,
    policy: InvalidRowPolicy,
    fitted: bool,
}

impl<S: Synthesizer> ConstrainedSynthesizer<S> {
    pub fn new(model: S, constraints: ConstraintSet) -> Self {
        Self {
            model,
            constraints,
            policy: InvalidRowPolicy::default(),
            fitted: false,
        }
    }

    pub fn with_policy(mut self, policy: InvalidRowPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    pub fn model(&self) -> &S {
        &self.model
    }

    /// Validate, filter and transform `real`, then fit the model on the result.
    pub fn fit(&mut self, real: Dataset) -> Result<FitSummary, SynthError> {
        let report = ValidityReport::evaluate(&self.constraints, &real)?;
        let rows_seen = real.len();

        let training = match self.policy {
            InvalidRowPolicy::Keep => real,
            InvalidRowPolicy::Drop => real.retain_valid(&report.combined)?,
            InvalidRowPolicy::Reject if !report.all_valid() => {
                return Err(SynthError::InvalidTrainingData {
                    invalid: report.invalid_rows(),
                    rows: rows_seen,
                });
            }
            InvalidRowPolicy::Reject => real,
        };
        let rows_used = training.len();

        let transformed = self.constraints.transform(training)?;
        self.model.fit(&transformed)?;
        self.fitted = true;

        Ok(FitSummary {
            rows_seen,
            rows_used,
            report,
        })
    }

    /// Sample `rows` rows and repair them with every registered constraint.
    pub fn sample(&mut self, rows: usize) -> Result<Dataset, SynthError> {
        if !self.fitted {
            return Err(SynthError::NotFitted);
        }
        let raw = self.model.sample(rows)?;
        if raw.len() != rows {
            return Err(SynthError::model(format!(
                "requested {rows} rows, model returned {}",
                raw.len()
            )));
        }
        Ok(self.constraints.reverse_transform(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::{IdentifierCategoryConsistency, RatioBoundConstraint};
    use crate::dataset;

    /// Replays a fixed batch; records what it was trained on.
    struct Replay {
        batch: Dataset,
        trained_on: Option<Dataset>,
    }

    impl Synthesizer for Replay {
        fn fit(&mut self, data: &Dataset) -> Result<(), SynthError> {
            self.trained_on = Some(data.clone());
            Ok(())
        }

        fn sample(&mut self, rows: usize) -> Result<Dataset, SynthError> {
            let mut out = Dataset::new(self.batch.columns().to_vec());
            for row in self.batch.rows().iter().cycle().take(rows) {
                out.push_row(row.clone())?;
            }
            Ok(out)
        }
    }

    fn constraints() -> ConstraintSet {
        let mut set = ConstraintSet::new();
        set.register(IdentifierCategoryConsistency::new(vec!["id".into(), "kind".into()]).unwrap());
        set.register(RatioBoundConstraint::new(vec!["salary".into(), "loan".into()], 1.5).unwrap());
        set
    }

    fn real() -> Dataset {
        dataset!(
            ["id", "kind", "salary", "loan"];
            ["P1", "primary", 100, 100],
            ["P2", "primary", 100, 100],
            ["S2", "secondary", 100, 500],
        )
        .unwrap()
    }

    fn replay() -> Replay {
        Replay {
            batch: dataset!(
                ["id", "kind", "salary", "loan"];
                ["Q7", "secondary", 10, 90],
                ["Q1", "primary", 10, 5],
            )
            .unwrap(),
            trained_on: None,
        }
    }

    #[test]
    fn drop_policy_trains_on_valid_rows_only() {
        let mut synth = ConstrainedSynthesizer::new(replay(), constraints());
        let summary = synth.fit(real()).unwrap();

        assert_eq!(summary.rows_seen, 3);
        assert_eq!(summary.rows_used, 1);
        assert_eq!(summary.report.outcomes[0].invalid_count(), 1);
        assert_eq!(summary.report.outcomes[1].invalid_count(), 1);
        assert_eq!(synth.model().trained_on.as_ref().map(Dataset::len), Some(1));
    }

    #[test]
    fn keep_policy_trains_on_everything() {
        let mut synth =
            ConstrainedSynthesizer::new(replay(), constraints()).with_policy(InvalidRowPolicy::Keep);
        let summary = synth.fit(real()).unwrap();
        assert_eq!(summary.rows_used, 3);
    }

    #[test]
    fn reject_policy_refuses_invalid_training_data() {
        let mut synth =
            ConstrainedSynthesizer::new(replay(), constraints()).with_policy(InvalidRowPolicy::Reject);
        let err = synth.fit(real()).unwrap_err();
        assert!(matches!(err, SynthError::InvalidTrainingData { invalid: 2, rows: 3 }));
    }

    #[test]
    fn sampled_rows_are_repaired() {
        let mut synth = ConstrainedSynthesizer::new(replay(), constraints());
        synth.fit(real()).unwrap();

        let sampled = synth.sample(5).unwrap();
        assert_eq!(sampled.len(), 5);
        assert!(synth.constraints().is_valid(&sampled).unwrap().all_valid());
        assert_eq!(sampled.value(0, 0), Some(&crate::domain::Value::from("Q2")));
        assert_eq!(sampled.value(0, 3), Some(&crate::domain::Value::Int(15)));
    }

    #[test]
    fn sampling_before_fit_fails() {
        let mut synth = ConstrainedSynthesizer::new(replay(), constraints());
        assert!(matches!(synth.sample(1), Err(SynthError::NotFitted)));
    }
}
