//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - survival table and cohort exports (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
