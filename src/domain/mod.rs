//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the fixed dataset roles (`TIME_COLUMN`, `EVENT_COLUMN`)
//! - stratification requests (`BinSpec`, `BinnedColumn`)
//! - figure layout and panel styling (`FigureLayout`, `PanelStyle`)

pub mod types;

pub use types::*;
