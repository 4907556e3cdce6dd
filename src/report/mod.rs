//! Validity reporting: per-constraint outcomes and their terminal rendering.

use crate::constraints::{Constraint, ConstraintSet};
use crate::domain::{Dataset, ValidityMask};
use crate::error::ConstraintResult;

pub mod format;

pub use format::*;

/// Result of one registered constraint over a dataset.
#[derive(Debug, Clone)]
pub struct ConstraintOutcome {
    pub constraint: &'static str,
    pub columns: Vec<String>,
    pub mask: ValidityMask,
}

impl ConstraintOutcome {
    pub fn invalid_count(&self) -> usize {
        self.mask.invalid_count()
    }
}

/// Outcomes for every registered constraint plus the combined mask.
#[derive(Debug, Clone)]
pub struct ValidityReport {
    pub rows: usize,
    pub outcomes: Vec<ConstraintOutcome>,
    pub combined: ValidityMask,
}

impl ValidityReport {
    pub fn evaluate(constraints: &ConstraintSet, data: &Dataset) -> ConstraintResult<Self> {
        let masks = constraints.validity(data)?;
        let combined = masks
            .iter()
            .fold(ValidityMask::all_true(data.len()), |acc, mask| acc.and(mask));

        let outcomes = constraints
            .iter()
            .zip(masks)
            .map(|(c, mask)| ConstraintOutcome {
                constraint: c.name(),
                columns: c.column_names().to_vec(),
                mask,
            })
            .collect();

        Ok(Self {
            rows: data.len(),
            outcomes,
            combined,
        })
    }

    pub fn all_valid(&self) -> bool {
        self.combined.all_valid()
    }

    pub fn invalid_rows(&self) -> usize {
        self.combined.invalid_count()
    }
}
