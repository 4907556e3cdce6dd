//! Shared domain types.
//!
//! A `Dataset` is row-oriented: an ordered header plus rows of `Value`s aligned
//! with that header. The header is fixed once the dataset is built; operations
//! that reshape data hand back a new dataset instead of mutating the caller's.

use std::fmt;

use crate::error::{ConstraintError, ConstraintResult};

/// Ordered column names a constraint operates over.
///
/// The first entry is the "primary" column for both built-in constraints.
pub type ColumnNames = Vec<String>;

/// A single cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing cell.
    Null,
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// UTF-8 text (identifiers, categorical tokens).
    Text(String),
}

impl Value {
    /// Get as string reference if this is a Text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of Int and Float values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::Text(_) => "Text",
        }
    }

    /// Render the value as a CSV cell.
    ///
    /// Floats use the `Debug` form so that `150.0` stays a float when the cell is
    /// read back in.
    pub fn to_cell(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => format!("{f:?}"),
            Value::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(fl) => write!(f, "{fl}"),
            Value::Text(s) => write!(f, "\"{s}\""),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

/// Tabular data with a fixed, ordered header.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Dataset {
    /// Create an empty dataset with the given header.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a dataset, rejecting rows whose width differs from the header.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Value>>) -> ConstraintResult<Self> {
        let mut dataset = Self::new(columns);
        dataset.rows.reserve(rows.len());
        for row in rows {
            dataset.push_row(row)?;
        }
        Ok(dataset)
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> ConstraintResult<()> {
        if row.len() != self.columns.len() {
            return Err(ConstraintError::RaggedRow {
                row: self.rows.len(),
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Mutable access to row cells. Rows cannot grow or shrink through this view.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [Value]> {
        self.rows.iter_mut().map(Vec::as_mut_slice)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of `name` in the header.
    pub fn column_index(&self, name: &str) -> ConstraintResult<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| ConstraintError::missing_column(name))
    }

    pub fn value(&self, row: usize, column: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Iterate one column top to bottom.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().filter_map(move |r| r.get(index))
    }

    /// Keep only the rows the mask flags as valid.
    pub fn retain_valid(mut self, mask: &ValidityMask) -> ConstraintResult<Self> {
        if mask.len() != self.rows.len() {
            return Err(ConstraintError::RowCountChanged {
                constraint: "validity mask".to_string(),
                before: self.rows.len(),
                after: mask.len(),
            });
        }
        let mut keep = mask.iter();
        self.rows.retain(|_| keep.next().unwrap_or(false));
        Ok(self)
    }
}

/// One boolean per row, aligned by position with the input dataset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidityMask(Vec<bool>);

impl ValidityMask {
    pub fn new(values: Vec<bool>) -> Self {
        Self(values)
    }

    /// A mask of `len` rows, all valid.
    pub fn all_true(len: usize) -> Self {
        Self(vec![true; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    /// True when every row passed (vacuously true for an empty mask).
    pub fn all_valid(&self) -> bool {
        self.0.iter().all(|v| *v)
    }

    pub fn valid_count(&self) -> usize {
        self.0.iter().filter(|v| **v).count()
    }

    pub fn invalid_count(&self) -> usize {
        self.len() - self.valid_count()
    }

    /// Row indices flagged invalid.
    pub fn invalid_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(idx, valid)| (!valid).then_some(idx))
    }

    /// Row-wise AND with another mask of the same length.
    pub fn and(mut self, other: &ValidityMask) -> Self {
        debug_assert_eq!(self.len(), other.len());
        for (a, b) in self.0.iter_mut().zip(other.iter()) {
            *a = *a && b;
        }
        self
    }
}

impl From<Vec<bool>> for ValidityMask {
    fn from(values: Vec<bool>) -> Self {
        Self(values)
    }
}

impl FromIterator<bool> for ValidityMask {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ValidityMask {
    type Item = bool;
    type IntoIter = std::vec::IntoIter<bool>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Build a `Dataset` from literal rows.
///
/// Evaluates to `ConstraintResult<Dataset>`; ragged rows are rejected.
#[macro_export]
macro_rules! dataset {
    ([$($col:expr),* $(,)?]; $([$($value:expr),* $(,)?]),* $(,)?) => {
        $crate::domain::Dataset::from_rows(
            vec![$($col.to_string()),*],
            vec![$(vec![$($crate::domain::Value::from($value)),*]),*],
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_rejects_ragged_rows() {
        let err = Dataset::from_rows(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![Value::Int(1), Value::Int(2)], vec![Value::Int(3)]],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConstraintError::RaggedRow {
                row: 1,
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn column_index_reports_missing_column() {
        let data = dataset!(["base", "bounded"]; [100, 150]).unwrap();
        assert_eq!(data.column_index("bounded").unwrap(), 1);
        assert_eq!(
            data.column_index("salary").unwrap_err(),
            ConstraintError::missing_column("salary")
        );
    }

    #[test]
    fn retain_valid_drops_flagged_rows_in_order() {
        let data = dataset!(["id"]; ["a"], ["b"], ["c"]).unwrap();
        let mask = ValidityMask::new(vec![true, false, true]);
        let kept = data.retain_valid(&mask).unwrap();
        let ids: Vec<_> = kept.column(0).filter_map(Value::as_str).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn retain_valid_rejects_misaligned_mask() {
        let data = dataset!(["id"]; ["a"], ["b"]).unwrap();
        assert!(data.retain_valid(&ValidityMask::all_true(3)).is_err());
    }

    #[test]
    fn mask_and_combines_row_wise() {
        let a = ValidityMask::new(vec![true, true, false]);
        let b = ValidityMask::new(vec![true, false, true]);
        let combined = a.and(&b);
        assert_eq!(combined.as_slice(), &[true, false, false]);
        assert_eq!(combined.invalid_rows().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(combined.valid_count(), 1);
    }

    #[test]
    fn float_cells_keep_their_decimal_point() {
        assert_eq!(Value::Float(150.0).to_cell(), "150.0");
        assert_eq!(Value::Int(150).to_cell(), "150");
        assert_eq!(Value::Null.to_cell(), "");
    }
}
