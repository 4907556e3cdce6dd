//! Read constraint registrations from JSON.
//!
//! The file holds an array of registrations, applied in file order:
//!
//! ```json
//! [
//!   { "constraint_class": "IdentifierCategoryConsistency",
//!     "constraint_parameters": { "column_names": ["id", "gender"] } },
//!   { "constraint_class": "RatioBoundConstraint",
//!     "constraint_parameters": { "column_names": ["salary", "loan"], "multiplier": 1.5 } }
//! ]
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::AppError;
use crate::registry::ConstraintSpec;

pub fn read_constraint_specs(path: &Path) -> Result<Vec<ConstraintSpec>, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to open constraints JSON '{}': {e}", path.display()),
        )
    })?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::new(2, format!("Invalid constraints JSON: {e}")))
}

pub fn parse_constraint_specs(json: &str) -> Result<Vec<ConstraintSpec>, AppError> {
    serde_json::from_str(json).map_err(|e| AppError::new(2, format!("Invalid constraints JSON: {e}")))
}
