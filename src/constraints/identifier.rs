//! Identifier/category consistency.
//!
//! An identifier string carries a one-digit category code: the first digit found
//! scanning left to right. For a row to be valid that digit must match the code of
//! the row's category token (`primary` → `1`, `secondary` → `2` by default).
//!
//! Repair rewrites exactly that first digit and leaves every other character of
//! the identifier alone, so `A2B2` with a primary category becomes `A1B2`.
//!
//! A category that is neither token has no code. Such a row is invalid, and
//! `reverse_transform` fails with `ConstraintError::Unrepairable` rather than
//! falling back to the secondary code, which would leave the row still invalid.
//! An identifier without any ASCII digit is handled the same way.

use regex_lite::Regex;

use crate::constraints::{Constraint, expect_columns, text_cell};
use crate::domain::{ColumnNames, Dataset, ValidityMask, Value};
use crate::error::{ConstraintError, ConstraintResult};

pub const DEFAULT_PRIMARY_TOKEN: &str = "primary";
pub const DEFAULT_SECONDARY_TOKEN: &str = "secondary";
pub const DEFAULT_PRIMARY_CODE: char = '1';
pub const DEFAULT_SECONDARY_CODE: char = '2';

/// Columns: `[identifier, category]`.
#[derive(Debug, Clone)]
pub struct IdentifierCategoryConsistency {
    columns: ColumnNames,
    primary_token: String,
    secondary_token: String,
    primary_code: char,
    secondary_code: char,
    digit: Regex,
}

impl IdentifierCategoryConsistency {
    pub const NAME: &'static str = "IdentifierCategoryConsistency";

    /// Create the constraint with the default tokens and codes.
    pub fn new(columns: ColumnNames) -> ConstraintResult<Self> {
        let columns = expect_columns(Self::NAME, columns, 2)?;
        Ok(Self {
            columns,
            primary_token: DEFAULT_PRIMARY_TOKEN.to_string(),
            secondary_token: DEFAULT_SECONDARY_TOKEN.to_string(),
            primary_code: DEFAULT_PRIMARY_CODE,
            secondary_code: DEFAULT_SECONDARY_CODE,
            // ASCII-only in regex-lite.
            digit: Regex::new(r"\d")?,
        })
    }

    /// Replace the category tokens.
    pub fn with_tokens(
        mut self,
        primary: impl Into<String>,
        secondary: impl Into<String>,
    ) -> ConstraintResult<Self> {
        let primary = primary.into();
        let secondary = secondary.into();
        if primary == secondary {
            return Err(ConstraintError::invalid_parameter(
                "secondary_token",
                format!("must differ from primary_token `{primary}`"),
            ));
        }
        self.primary_token = primary;
        self.secondary_token = secondary;
        Ok(self)
    }

    /// Replace the digit codes. Both must be distinct ASCII digits.
    pub fn with_codes(mut self, primary: char, secondary: char) -> ConstraintResult<Self> {
        for (parameter, code) in [("primary_code", primary), ("secondary_code", secondary)] {
            if !code.is_ascii_digit() {
                return Err(ConstraintError::invalid_parameter(
                    parameter,
                    format!("`{code}` is not a single ASCII digit"),
                ));
            }
        }
        if primary == secondary {
            return Err(ConstraintError::invalid_parameter(
                "secondary_code",
                format!("must differ from primary_code `{primary}`"),
            ));
        }
        self.primary_code = primary;
        self.secondary_code = secondary;
        Ok(self)
    }

    pub fn identifier_column(&self) -> &str {
        &self.columns[0]
    }

    pub fn category_column(&self) -> &str {
        &self.columns[1]
    }

    /// First ASCII digit in `identifier`, scanning left to right.
    pub fn first_digit(&self, identifier: &str) -> Option<char> {
        self.digit
            .find(identifier)
            .and_then(|m| m.as_str().chars().next())
    }

    fn code_for(&self, category: &str) -> Option<char> {
        if category == self.primary_token {
            Some(self.primary_code)
        } else if category == self.secondary_token {
            Some(self.secondary_code)
        } else {
            None
        }
    }

    /// Rewrite the first digit of `identifier` to `code`. `None` if there is no digit.
    fn replace_first_digit(&self, identifier: &str, code: char) -> Option<String> {
        let m = self.digit.find(identifier)?;
        let mut out = String::with_capacity(identifier.len());
        out.push_str(&identifier[..m.start()]);
        out.push(code);
        out.push_str(&identifier[m.end()..]);
        Some(out)
    }
}

impl Constraint for IdentifierCategoryConsistency {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn column_names(&self) -> &[String] {
        &self.columns
    }

    fn text_columns(&self) -> &[String] {
        &self.columns
    }

    fn is_valid(&self, data: &Dataset) -> ConstraintResult<ValidityMask> {
        let id_idx = data.column_index(self.identifier_column())?;
        let cat_idx = data.column_index(self.category_column())?;

        data.rows()
            .iter()
            .enumerate()
            .map(|(row, cells)| {
                let identifier = text_cell(&cells[id_idx], self.identifier_column(), row)?;
                let category = text_cell(&cells[cat_idx], self.category_column(), row)?;
                let expected = self.code_for(category);
                let found = self.first_digit(identifier);
                Ok(expected.is_some() && expected == found)
            })
            .collect()
    }

    fn reverse_transform(&self, mut data: Dataset) -> ConstraintResult<Dataset> {
        let id_idx = data.column_index(self.identifier_column())?;
        let cat_idx = data.column_index(self.category_column())?;

        for (row, cells) in data.rows_mut().enumerate() {
            let category = text_cell(&cells[cat_idx], self.category_column(), row)?;
            let code = self.code_for(category).ok_or_else(|| {
                ConstraintError::unrepairable(
                    Self::NAME,
                    row,
                    format!(
                        "category `{category}` is neither `{}` nor `{}`",
                        self.primary_token, self.secondary_token
                    ),
                )
            })?;

            let identifier = text_cell(&cells[id_idx], self.identifier_column(), row)?;
            let repaired = self.replace_first_digit(identifier, code).ok_or_else(|| {
                ConstraintError::unrepairable(
                    Self::NAME,
                    row,
                    format!("identifier `{identifier}` contains no digit"),
                )
            })?;
            cells[id_idx] = Value::Text(repaired);
        }

        Ok(data)
    }
}
