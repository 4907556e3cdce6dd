//! Input/output helpers.
//!
//! - CSV ingest with per-column type inference (`ingest`)
//! - CSV export (`export`)
//! - constraint registration JSON (`spec`)

pub mod export;
pub mod ingest;
pub mod spec;

pub use export::*;
pub use ingest::*;
pub use spec::*;
