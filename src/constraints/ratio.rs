//! Ratio bound between two numeric columns.
//!
//! `bounded ≤ multiplier × base` must hold for every row. Repair clamps
//! `bounded` down to the bound and keeps the column's numeric type: floats are
//! set to the bound itself, integers to the largest integer not above it.
//! Integer cells are compared against that integer exactly, however large.

use crate::constraints::{Constraint, expect_columns, numeric_cell};
use crate::domain::{ColumnNames, Dataset, ValidityMask, Value};
use crate::error::{ConstraintError, ConstraintResult};

/// Multiplier used when a registration does not supply one.
pub const DEFAULT_MULTIPLIER: f64 = 1.5;

/// Columns: `[base, bounded]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RatioBoundConstraint {
    columns: ColumnNames,
    multiplier: f64,
}

impl RatioBoundConstraint {
    pub const NAME: &'static str = "RatioBoundConstraint";

    pub fn new(columns: ColumnNames, multiplier: f64) -> ConstraintResult<Self> {
        let columns = expect_columns(Self::NAME, columns, 2)?;
        if !multiplier.is_finite() {
            return Err(ConstraintError::invalid_parameter(
                "multiplier",
                format!("must be finite, got {multiplier}"),
            ));
        }
        Ok(Self { columns, multiplier })
    }

    pub fn base_column(&self) -> &str {
        &self.columns[0]
    }

    pub fn bounded_column(&self) -> &str {
        &self.columns[1]
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Upper bound for `bounded` given `base`.
    ///
    /// Float cells are checked and clamped against this one expression, so a
    /// clamped float compares equal to the bound it was clamped to.
    pub fn bound(&self, base: f64) -> f64 {
        self.multiplier * base
    }

    /// Largest integer not above `multiplier × base`.
    ///
    /// Integer bases go through `floor_product`, so no `i64 → f64` rounding
    /// happens on the way. `None` when the bound is NaN.
    fn int_bound(&self, base: &Value) -> Option<i128> {
        match base {
            Value::Int(b) => Some(floor_product(self.multiplier, *b)),
            Value::Float(f) => {
                let bound = self.bound(*f);
                // `as` saturates infinities at the i128 limits.
                (!bound.is_nan()).then(|| bound.floor() as i128)
            }
            _ => None,
        }
    }

    /// Non-strict comparison; NaN is never within bounds.
    fn within(&self, base: &Value, bounded: &Value) -> bool {
        match bounded {
            Value::Int(i) => self
                .int_bound(base)
                .is_some_and(|limit| i128::from(*i) <= limit),
            Value::Float(f) => base.as_f64().is_some_and(|b| *f <= self.bound(b)),
            _ => false,
        }
    }

    fn clamp(&self, base: &Value, bounded: &Value) -> Option<Value> {
        match bounded {
            Value::Float(f) if !f.is_nan() => {
                let bound = self.bound(base.as_f64()?);
                (!bound.is_nan()).then_some(Value::Float(bound))
            }
            Value::Int(_) => {
                let limit = self.int_bound(base)?;
                if limit < i128::from(i64::MIN) {
                    return None;
                }
                Some(Value::Int(i64::try_from(limit).unwrap_or(i64::MAX)))
            }
            _ => None,
        }
    }
}

/// `floor(multiplier × base)` in exact integer arithmetic.
///
/// A finite f64 is `mantissa × 2^exp` with a 53-bit mantissa, so the product
/// with an i64 fits in 116 bits. Results beyond i128 saturate.
fn floor_product(multiplier: f64, base: i64) -> i128 {
    if multiplier == 0.0 || base == 0 {
        return 0;
    }
    let bits = multiplier.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let fraction = i128::from(bits & ((1u64 << 52) - 1));
    let (mantissa, exp) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1i128 << 52), biased - 1075)
    };
    let mantissa = if bits >> 63 == 1 { -mantissa } else { mantissa };
    let product = mantissa * i128::from(base);

    if exp >= 0 {
        let shift = exp.unsigned_abs();
        if product.unsigned_abs().leading_zeros() > shift {
            product << shift
        } else if product > 0 {
            i128::MAX
        } else {
            i128::MIN
        }
    } else {
        let shift = exp.unsigned_abs();
        // Arithmetic shift floors toward negative infinity.
        if shift >= 127 {
            if product < 0 { -1 } else { 0 }
        } else {
            product >> shift
        }
    }
}

impl Constraint for RatioBoundConstraint {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn column_names(&self) -> &[String] {
        &self.columns
    }

    fn is_valid(&self, data: &Dataset) -> ConstraintResult<ValidityMask> {
        let base_idx = data.column_index(self.base_column())?;
        let bounded_idx = data.column_index(self.bounded_column())?;

        data.rows()
            .iter()
            .enumerate()
            .map(|(row, cells)| {
                let base = &cells[base_idx];
                let bounded = &cells[bounded_idx];
                numeric_cell(base, self.base_column(), row)?;
                numeric_cell(bounded, self.bounded_column(), row)?;
                Ok(self.within(base, bounded))
            })
            .collect()
    }

    fn reverse_transform(&self, mut data: Dataset) -> ConstraintResult<Dataset> {
        let base_idx = data.column_index(self.base_column())?;
        let bounded_idx = data.column_index(self.bounded_column())?;

        for (row, cells) in data.rows_mut().enumerate() {
            let base = &cells[base_idx];
            let current = &cells[bounded_idx];
            numeric_cell(base, self.base_column(), row)?;
            numeric_cell(current, self.bounded_column(), row)?;
            if self.within(base, current) {
                continue;
            }

            let clamped = self.clamp(base, current).ok_or_else(|| {
                ConstraintError::unrepairable(
                    Self::NAME,
                    row,
                    format!("cannot clamp {current} to {} x {base}", self.multiplier),
                )
            })?;
            cells[bounded_idx] = clamped;
        }

        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset;

    fn constraint() -> RatioBoundConstraint {
        RatioBoundConstraint::new(vec!["base".into(), "bounded".into()], 1.5).unwrap()
    }

    #[test]
    fn bounded_above_ratio_is_invalid() {
        let data = dataset!(["base", "bounded"]; [100, 200], [100, 100]).unwrap();
        let mask = constraint().is_valid(&data).unwrap();
        assert_eq!(mask.as_slice(), &[false, true]);
    }

    #[test]
    fn exact_bound_is_valid() {
        let data = dataset!(["base", "bounded"]; [100.0, 150.0], [100, 150]).unwrap();
        assert!(constraint().is_valid(&data).unwrap().all_valid());
    }

    #[test]
    fn repair_clamps_to_the_bound() {
        let data = dataset!(["base", "bounded"]; [100, 200], [100, 100]).unwrap();
        let repaired = constraint().reverse_transform(data).unwrap();
        assert_eq!(repaired.value(0, 1), Some(&Value::Int(150)));
        assert_eq!(repaired.value(1, 1), Some(&Value::Int(100)));
    }

    #[test]
    fn repair_keeps_float_columns_float() {
        let data = dataset!(["base", "bounded"]; [100.0, 200.0], [0.1, 0.3]).unwrap();
        let c = constraint();
        let repaired = c.reverse_transform(data).unwrap();
        assert_eq!(repaired.value(0, 1), Some(&Value::Float(150.0)));
        assert_eq!(repaired.value(1, 1), Some(&Value::Float(1.5 * 0.1)));
        assert!(c.is_valid(&repaired).unwrap().all_valid());
    }

    #[test]
    fn repair_floors_fractional_bounds_for_int_columns() {
        // 1.5 × 101 = 151.5; an integer column cannot hold that.
        let data = dataset!(["base", "bounded"]; [101, 400]).unwrap();
        let c = constraint();
        let repaired = c.reverse_transform(data).unwrap();
        assert_eq!(repaired.value(0, 1), Some(&Value::Int(151)));
        assert!(c.is_valid(&repaired).unwrap().all_valid());
    }

    #[test]
    fn repair_is_idempotent() {
        let data = dataset!(["base", "bounded"]; [3.3, 9.9], [-4, 1], [7, 2]).unwrap();
        let c = constraint();
        let once = c.reverse_transform(data).unwrap();
        let twice = c.reverse_transform(once.clone()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn negative_base_bounds_below_zero() {
        let data = dataset!(["base", "bounded"]; [-10, -14], [-10, -16]).unwrap();
        let mask = constraint().is_valid(&data).unwrap();
        assert_eq!(mask.as_slice(), &[false, true]);
    }

    #[test]
    fn nan_bounded_is_invalid_and_unrepairable() {
        let data = dataset!(["base", "bounded"]; [1.0, f64::NAN]).unwrap();
        let c = constraint();
        assert!(!c.is_valid(&data).unwrap().all_valid());
        assert!(matches!(
            c.reverse_transform(data).unwrap_err(),
            ConstraintError::Unrepairable { row: 0, .. }
        ));
    }

    #[test]
    fn text_value_is_a_type_mismatch() {
        let data = dataset!(["base", "bounded"]; ["lots", 1]).unwrap();
        assert_eq!(
            constraint().is_valid(&data).unwrap_err(),
            ConstraintError::type_mismatch("base", 0, "Int or Float", "Text")
        );
    }

    #[test]
    fn multiplier_is_a_constructor_parameter() {
        let c = RatioBoundConstraint::new(vec!["base".into(), "bounded".into()], 2.0).unwrap();
        let data = dataset!(["base", "bounded"]; [100, 200]).unwrap();
        assert!(c.is_valid(&data).unwrap().all_valid());
        assert!(RatioBoundConstraint::new(vec!["a".into(), "b".into()], f64::INFINITY).is_err());
    }

    #[test]
    fn integers_beyond_f64_precision_compare_exactly() {
        let c = RatioBoundConstraint::new(vec!["base".into(), "bounded".into()], 1.0).unwrap();
        let edge = 1i64 << 53;
        let data = dataset!(["base", "bounded"]; [edge, edge + 1], [edge + 1, edge + 1]).unwrap();
        assert_eq!(c.is_valid(&data).unwrap().as_slice(), &[false, true]);

        let repaired = c.reverse_transform(data).unwrap();
        assert_eq!(repaired.value(0, 1), Some(&Value::Int(edge)));
        assert!(c.is_valid(&repaired).unwrap().all_valid());
    }

    #[test]
    fn floor_product_is_exact() {
        assert_eq!(floor_product(1.5, 101), 151);
        assert_eq!(floor_product(-1.5, 3), -5);
        assert_eq!(floor_product(1.0, i64::MAX), i128::from(i64::MAX));
        assert_eq!(floor_product(0.5, i64::MIN), i128::from(i64::MIN) / 2);
        assert_eq!(floor_product(0.0, 7), 0);
        assert_eq!(floor_product(f64::MAX, 2), i128::MAX);
        assert_eq!(floor_product(f64::MIN_POSITIVE, -1), -1);
    }

    #[test]
    fn huge_bound_saturates_integer_repair() {
        let c = RatioBoundConstraint::new(vec!["base".into(), "bounded".into()], -4.0).unwrap();
        let data = dataset!(["base", "bounded"]; [i64::MIN, i64::MAX]).unwrap();
        assert!(c.is_valid(&data).unwrap().all_valid());

        let data = dataset!(["base", "bounded"]; [i64::MAX, 0]).unwrap();
        assert!(matches!(
            c.reverse_transform(data).unwrap_err(),
            ConstraintError::Unrepairable { row: 0, .. }
        ));
    }

    #[test]
    fn wrong_column_count_is_rejected() {
        let err = RatioBoundConstraint::new(vec!["base".into()], 1.5).unwrap_err();
        assert_eq!(err, ConstraintError::column_count(RatioBoundConstraint::NAME, 2, 1));
    }
}
