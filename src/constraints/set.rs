//! Registration-ordered composition of constraints.
//!
//! Chained operations (`transform`, `reverse_transform`) run in registration order,
//! each consuming the previous constraint's output. That order is part of the
//! contract: repairs do not commute in general, since a later repair may read a
//! column an earlier one just rewrote.
//!
//! Predicates are read-only, so `validity` evaluates constraints in parallel and
//! returns the masks in registration order.

use rayon::prelude::*;

use crate::constraints::{Constraint, ConstraintKind};
use crate::domain::{Dataset, ValidityMask};
use crate::error::{ConstraintError, ConstraintResult};
use crate::registry::{ConstraintSpec, build_constraint};

#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    constraints: Vec<ConstraintKind>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from registration records, preserving their order.
    pub fn from_specs(specs: &[ConstraintSpec]) -> ConstraintResult<Self> {
        let mut set = Self::new();
        for spec in specs {
            set.register_spec(spec)?;
        }
        Ok(set)
    }

    /// Append a constraint; it runs after every constraint registered before it.
    pub fn register(&mut self, constraint: impl Into<ConstraintKind>) {
        self.constraints.push(constraint.into());
    }

    pub fn register_spec(&mut self, spec: &ConstraintSpec) -> ConstraintResult<()> {
        self.constraints.push(build_constraint(spec)?);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConstraintKind> {
        self.constraints.iter()
    }

    /// Columns any registered constraint needs as text, deduplicated, first-seen order.
    pub fn text_columns(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for column in self.constraints.iter().flat_map(|c| c.text_columns()) {
            if !out.contains(column) {
                out.push(column.clone());
            }
        }
        out
    }

    /// Per-constraint masks, in registration order.
    pub fn validity(&self, data: &Dataset) -> ConstraintResult<Vec<ValidityMask>> {
        self.constraints
            .par_iter()
            .map(|c| {
                let mask = c.is_valid(data)?;
                if mask.len() != data.len() {
                    return Err(ConstraintError::RowCountChanged {
                        constraint: c.name().to_string(),
                        before: data.len(),
                        after: mask.len(),
                    });
                }
                Ok(mask)
            })
            .collect()
    }

    /// A row is valid when every registered constraint accepts it.
    pub fn is_valid(&self, data: &Dataset) -> ConstraintResult<ValidityMask> {
        Ok(self
            .validity(data)?
            .iter()
            .fold(ValidityMask::all_true(data.len()), |acc, mask| acc.and(mask)))
    }

    /// Drop rows that any constraint rejects.
    pub fn filter_valid(&self, data: Dataset) -> ConstraintResult<Dataset> {
        let mask = self.is_valid(&data)?;
        data.retain_valid(&mask)
    }

    pub fn transform(&self, data: Dataset) -> ConstraintResult<Dataset> {
        self.constraints
            .iter()
            .try_fold(data, |data, c| apply_in_order(c, data, ConstraintKind::transform))
    }

    pub fn reverse_transform(&self, data: Dataset) -> ConstraintResult<Dataset> {
        self.constraints
            .iter()
            .try_fold(data, |data, c| {
                apply_in_order(c, data, ConstraintKind::reverse_transform)
            })
    }
}

fn apply_in_order(
    constraint: &ConstraintKind,
    data: Dataset,
    op: fn(&ConstraintKind, Dataset) -> ConstraintResult<Dataset>,
) -> ConstraintResult<Dataset> {
    let before = data.len();
    let out = op(constraint, data)?;
    if out.len() != before {
        return Err(ConstraintError::RowCountChanged {
            constraint: constraint.name().to_string(),
            before,
            after: out.len(),
        });
    }
    Ok(out)
}
