//! The constraint contract and its built-in rule families.
//!
//! Every constraint exposes the same three operations:
//!
//! - `is_valid`: per-row predicate over real or synthetic data
//! - `transform`: reshape real data before a model is fitted on it
//! - `reverse_transform`: deterministic repair of sampled rows
//!
//! Constraints own their column names and parameters and nothing else. They never
//! hold on to a dataset between calls; `transform` and `reverse_transform` take
//! the dataset by value and hand back a new one.

pub mod identifier;
pub mod ratio;
pub mod set;

pub use identifier::*;
pub use ratio::*;
pub use set::*;

use crate::domain::{Dataset, ValidityMask, Value};
use crate::error::{ConstraintError, ConstraintResult};

/// A domain rule the generated data must respect.
pub trait Constraint: Send + Sync {
    /// Class identifier used at registration.
    fn name(&self) -> &'static str;

    /// Columns the constraint reads or repairs, in declaration order.
    fn column_names(&self) -> &[String];

    /// Columns that must be ingested as text rather than type-inferred.
    fn text_columns(&self) -> &[String] {
        &[]
    }

    /// One boolean per row of `data`. Does not modify `data`.
    fn is_valid(&self, data: &Dataset) -> ConstraintResult<ValidityMask>;

    /// Training representation of `data`. Identity unless overridden.
    fn transform(&self, data: Dataset) -> ConstraintResult<Dataset> {
        Ok(data)
    }

    /// Repair sampled rows so that `is_valid` holds for every row.
    ///
    /// Implementations must keep the row count and every column they do not own,
    /// and must not assume columns owned by other constraints are untouched.
    fn reverse_transform(&self, data: Dataset) -> ConstraintResult<Dataset>;
}

/// Closed set of registered rule families.
#[derive(Debug, Clone)]
pub enum ConstraintKind {
    IdentifierCategory(IdentifierCategoryConsistency),
    RatioBound(RatioBoundConstraint),
}

impl Constraint for ConstraintKind {
    fn name(&self) -> &'static str {
        match self {
            ConstraintKind::IdentifierCategory(c) => c.name(),
            ConstraintKind::RatioBound(c) => c.name(),
        }
    }

    fn column_names(&self) -> &[String] {
        match self {
            ConstraintKind::IdentifierCategory(c) => c.column_names(),
            ConstraintKind::RatioBound(c) => c.column_names(),
        }
    }

    fn text_columns(&self) -> &[String] {
        match self {
            ConstraintKind::IdentifierCategory(c) => c.text_columns(),
            ConstraintKind::RatioBound(c) => c.text_columns(),
        }
    }

    fn is_valid(&self, data: &Dataset) -> ConstraintResult<ValidityMask> {
        match self {
            ConstraintKind::IdentifierCategory(c) => c.is_valid(data),
            ConstraintKind::RatioBound(c) => c.is_valid(data),
        }
    }

    fn transform(&self, data: Dataset) -> ConstraintResult<Dataset> {
        match self {
            ConstraintKind::IdentifierCategory(c) => c.transform(data),
            ConstraintKind::RatioBound(c) => c.transform(data),
        }
    }

    fn reverse_transform(&self, data: Dataset) -> ConstraintResult<Dataset> {
        match self {
            ConstraintKind::IdentifierCategory(c) => c.reverse_transform(data),
            ConstraintKind::RatioBound(c) => c.reverse_transform(data),
        }
    }
}

impl From<IdentifierCategoryConsistency> for ConstraintKind {
    fn from(value: IdentifierCategoryConsistency) -> Self {
        ConstraintKind::IdentifierCategory(value)
    }
}

impl From<RatioBoundConstraint> for ConstraintKind {
    fn from(value: RatioBoundConstraint) -> Self {
        ConstraintKind::RatioBound(value)
    }
}

/// Check the declared column count at construction time.
pub(crate) fn expect_columns(
    constraint: &str,
    columns: Vec<String>,
    expected: usize,
) -> ConstraintResult<Vec<String>> {
    if columns.len() != expected {
        return Err(ConstraintError::column_count(constraint, expected, columns.len()));
    }
    Ok(columns)
}

pub(crate) fn text_cell<'a>(value: &'a Value, column: &str, row: usize) -> ConstraintResult<&'a str> {
    value
        .as_str()
        .ok_or_else(|| ConstraintError::type_mismatch(column, row, "Text", value.type_name()))
}

pub(crate) fn numeric_cell(value: &Value, column: &str, row: usize) -> ConstraintResult<f64> {
    value
        .as_f64()
        .ok_or_else(|| ConstraintError::type_mismatch(column, row, "Int or Float", value.type_name()))
}
