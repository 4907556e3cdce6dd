//! `synth-constraints` library crate.
//!
//! Domain rules for synthetic tabular data: a three-operation constraint
//! contract (`is_valid`, `transform`, `reverse_transform`), two rule families,
//! and registration-ordered composition around a pluggable synthesizer.
//!
//! The binary (`synthc`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - constraints can be reused by any synthesizer implementing `synth::Synthesizer`

pub mod app;
pub mod cli;
pub mod constraints;
pub mod domain;
pub mod error;
pub mod io;
pub mod registry;
pub mod report;
pub mod synth;
