//! Domain types shared by constraints, synthesizers and I/O.
//!
//! This module defines:
//!
//! - scalar cell values (`Value`)
//! - the tabular container handed to every constraint (`Dataset`)
//! - per-row predicate results (`ValidityMask`)

pub mod types;

pub use types::*;
