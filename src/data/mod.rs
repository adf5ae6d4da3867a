//! Dataset model and synthetic data.
//!
//! - `table`: the typed in-memory table the pipeline stratifies
//! - `sample`: a seeded synthetic heart-failure cohort

pub mod sample;
pub mod table;

pub use sample::{CohortRow, cohort_dataset, generate_cohort};
pub use table::{Column, ColumnValues, Dataset};
