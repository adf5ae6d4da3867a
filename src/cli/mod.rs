//! Command-line parsing for the survival-curve plotter.
//!
//! Argument parsing and command dispatch stay separate from the estimation and
//! rendering code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{BinnedColumn, FigureKind};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "km", version, about = "Kaplan-Meier survival curves stratified by covariates")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the figures and write them as SVG files.
    Plot(PlotArgs),
    /// Build the figures and display them in the terminal.
    Show(DataArgs),
    /// Print the per-curve summary table only (useful for scripting).
    Summary(DataArgs),
    /// Write a synthetic heart-failure-like cohort CSV.
    Sample(SampleArgs),
}

/// Dataset and stratification options shared by every figure-building command.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// Input CSV. Falls back to the `KM_DATA` environment variable.
    #[arg(short = 'd', long, value_name = "CSV")]
    pub data: Option<PathBuf>,

    /// Categorical columns, comma-separated (default: the heart-failure set).
    #[arg(long, value_delimiter = ',', value_name = "COLUMNS")]
    pub categorical: Vec<String>,

    /// Continuous column and bins as `name=COUNT` or `name=EDGE,EDGE,...`.
    /// Repeat for each column (default: the heart-failure set).
    #[arg(long, value_name = "NAME=SPEC")]
    pub continuous: Vec<BinnedColumn>,

    /// Build only one of the two figures.
    #[arg(long, value_enum)]
    pub only: Option<FigureKind>,
}

/// Options for `km plot`.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Directory the SVG files are written to.
    #[arg(short = 'o', long, default_value = "figures")]
    pub out_dir: PathBuf,

    /// Do not print the summary table.
    #[arg(long)]
    pub no_summary: bool,

    /// Export every curve's survival table to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

/// Options for `km sample`.
#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Number of synthetic patients.
    #[arg(short = 'n', long, default_value_t = 299)]
    pub rows: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Output CSV path.
    #[arg(short = 'o', long, default_value = "heart_failure_sample.csv")]
    pub out: PathBuf,
}
