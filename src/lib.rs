//! `km-curves` library crate.
//!
//! The binary (`km`) is a thin wrapper around this library so that:
//!
//! - estimation and stratification are testable without spawning processes
//! - figures can be built and rendered from other front-ends

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod estimate;
pub mod figure;
pub mod io;
pub mod render;
pub mod report;
pub mod strata;
pub mod tui;
