//! Error types.
//!
//! - `ConstraintError`: contract violations raised by constraints and the registry
//! - `SynthError`: failures surfaced by a synthesizer run
//! - `AppError`: binary-level error carrying a process exit code

use thiserror::Error;

/// Result type for constraint operations.
pub type ConstraintResult<T> = Result<T, ConstraintError>;

/// Errors raised when a constraint is handed data that breaks its contract.
///
/// None of these are produced for well-typed input to `is_valid`; they signal a
/// schema problem on the caller's side, or a row that no fixed repair can fix.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstraintError {
    #[error("Missing column: `{column}`")]
    MissingColumn { column: String },

    #[error("{constraint} expects {expected} column names, got {actual}")]
    ColumnCount {
        constraint: String,
        expected: usize,
        actual: usize,
    },

    #[error("Row {row} has {actual} values, header has {expected} columns")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Column `{column}` row {row}: expected {expected}, found {found}")]
    TypeMismatch {
        column: String,
        row: usize,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{constraint} cannot repair row {row}: {reason}")]
    Unrepairable {
        constraint: String,
        row: usize,
        reason: String,
    },

    #[error("{constraint} changed the row count from {before} to {after}")]
    RowCountChanged {
        constraint: String,
        before: usize,
        after: usize,
    },

    #[error("Unknown constraint class: {name}")]
    UnknownConstraint { name: String },

    #[error("Invalid parameter `{parameter}`: {message}")]
    InvalidParameter { parameter: String, message: String },

    #[error("Pattern error: {message}")]
    Pattern { message: String },
}

impl ConstraintError {
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }

    pub fn column_count(constraint: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::ColumnCount {
            constraint: constraint.into(),
            expected,
            actual,
        }
    }

    pub fn type_mismatch(
        column: impl Into<String>,
        row: usize,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            column: column.into(),
            row,
            expected,
            found,
        }
    }

    pub fn unrepairable(constraint: impl Into<String>, row: usize, reason: impl Into<String>) -> Self {
        Self::Unrepairable {
            constraint: constraint.into(),
            row,
            reason: reason.into(),
        }
    }

    pub fn unknown_constraint(name: impl Into<String>) -> Self {
        Self::UnknownConstraint { name: name.into() }
    }

    pub fn invalid_parameter(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            message: message.into(),
        }
    }
}

impl From<regex_lite::Error> for ConstraintError {
    fn from(e: regex_lite::Error) -> Self {
        Self::Pattern {
            message: e.to_string(),
        }
    }
}

/// Errors surfaced while fitting or sampling through a synthesizer.
#[derive(Debug, Error)]
pub enum SynthError {
    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    #[error("Model error: {message}")]
    Model { message: String },

    #[error("Synthesizer has not been fitted")]
    NotFitted,

    #[error("{invalid} of {rows} training rows violate a constraint")]
    InvalidTrainingData { invalid: usize, rows: usize },
}

impl SynthError {
    pub fn model(message: impl Into<String>) -> Self {
        Self::Model {
            message: message.into(),
        }
    }
}

/// Error returned by the `synthc` binary.
///
/// Exit codes:
/// - 2: bad input (files, schema, constraint specs)
/// - 3: `check` found rows that violate a constraint
/// - 4: internal failure (sampling, repair)
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<ConstraintError> for AppError {
    fn from(e: ConstraintError) -> Self {
        AppError::new(2, e.to_string())
    }
}

impl From<SynthError> for AppError {
    fn from(e: SynthError) -> Self {
        match e {
            SynthError::Constraint(inner) => inner.into(),
            e @ SynthError::InvalidTrainingData { .. } => AppError::new(3, e.to_string()),
            other => AppError::new(4, other.to_string()),
        }
    }
}
