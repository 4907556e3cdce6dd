//! Constraint registration records.
//!
//! A registration is a class identifier plus a parameter mapping that always
//! carries `column_names`; any other entry is a class-specific parameter:
//!
//! ```json
//! {
//!   "constraint_class": "RatioBoundConstraint",
//!   "constraint_parameters": { "column_names": ["salary", "loan"], "multiplier": 1.5 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::constraints::{ConstraintKind, IdentifierCategoryConsistency, RatioBoundConstraint};
use crate::constraints::{DEFAULT_MULTIPLIER, DEFAULT_PRIMARY_CODE, DEFAULT_PRIMARY_TOKEN};
use crate::constraints::{DEFAULT_SECONDARY_CODE, DEFAULT_SECONDARY_TOKEN};
use crate::error::{ConstraintError, ConstraintResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintSpec {
    pub constraint_class: String,
    pub constraint_parameters: ConstraintParameters,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConstraintParameters {
    pub column_names: Vec<String>,
    /// Class-specific parameters.
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl ConstraintSpec {
    pub fn new(class: impl Into<String>, column_names: Vec<String>) -> Self {
        Self {
            constraint_class: class.into(),
            constraint_parameters: ConstraintParameters {
                column_names,
                extra: Map::new(),
            },
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.constraint_parameters
            .extra
            .insert(name.into(), value.into());
        self
    }
}

/// Instantiate the constraint a registration names.
pub fn build_constraint(spec: &ConstraintSpec) -> ConstraintResult<ConstraintKind> {
    let params = &spec.constraint_parameters;
    let columns = params.column_names.clone();

    match spec.constraint_class.as_str() {
        IdentifierCategoryConsistency::NAME => {
            reject_unknown(
                params,
                &["primary_token", "secondary_token", "primary_code", "secondary_code"],
            )?;
            let constraint = IdentifierCategoryConsistency::new(columns)?
                .with_tokens(
                    optional_str(params, "primary_token")?.unwrap_or(DEFAULT_PRIMARY_TOKEN),
                    optional_str(params, "secondary_token")?.unwrap_or(DEFAULT_SECONDARY_TOKEN),
                )?
                .with_codes(
                    optional_code(params, "primary_code")?.unwrap_or(DEFAULT_PRIMARY_CODE),
                    optional_code(params, "secondary_code")?.unwrap_or(DEFAULT_SECONDARY_CODE),
                )?;
            Ok(constraint.into())
        }
        RatioBoundConstraint::NAME => {
            reject_unknown(params, &["multiplier"])?;
            let multiplier = optional_f64(params, "multiplier")?.unwrap_or(DEFAULT_MULTIPLIER);
            Ok(RatioBoundConstraint::new(columns, multiplier)?.into())
        }
        other => Err(ConstraintError::unknown_constraint(other)),
    }
}

fn reject_unknown(params: &ConstraintParameters, allowed: &[&str]) -> ConstraintResult<()> {
    match params.extra.keys().find(|k| !allowed.contains(&k.as_str())) {
        Some(key) => Err(ConstraintError::invalid_parameter(key.as_str(), "unexpected parameter")),
        None => Ok(()),
    }
}

fn optional_str<'a>(params: &'a ConstraintParameters, name: &str) -> ConstraintResult<Option<&'a str>> {
    match params.extra.get(name) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(ConstraintError::invalid_parameter(
            name,
            format!("expected a string, got {other}"),
        )),
    }
}

fn optional_f64(params: &ConstraintParameters, name: &str) -> ConstraintResult<Option<f64>> {
    match params.extra.get(name) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Number(n)) => n.as_f64().map(Some).ok_or_else(|| {
            ConstraintError::invalid_parameter(name, format!("`{n}` is not representable as f64"))
        }),
        Some(other) => Err(ConstraintError::invalid_parameter(
            name,
            format!("expected a number, got {other}"),
        )),
    }
}

/// A code is given as a one-character string (`"1"`) or a single-digit number (`1`).
fn optional_code(params: &ConstraintParameters, name: &str) -> ConstraintResult<Option<char>> {
    let invalid = |got: &JsonValue| {
        ConstraintError::invalid_parameter(name, format!("expected a single digit, got {got}"))
    };
    let Some(value) = params.extra.get(name) else {
        return Ok(None);
    };
    match value {
        JsonValue::Null => Ok(None),
        JsonValue::String(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Some(c)),
                _ => Err(invalid(value)),
            }
        }
        JsonValue::Number(n) => n
            .as_u64()
            .filter(|d| *d < 10)
            .and_then(|d| char::from_digit(d as u32, 10))
            .map(Some)
            .ok_or_else(|| invalid(value)),
        other => Err(invalid(other)),
    }
}
