//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the "real main" that:
//! - parses CLI arguments and the environment
//! - loads the dataset
//! - builds the categorical and continuous figures
//! - writes SVGs, summaries and exports, or opens the terminal viewer

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::cli::{Command, DataArgs, PlotArgs, SampleArgs};
use crate::data::Dataset;
use crate::domain::{BinnedColumn, DEFAULT_CATEGORICAL, FigureKind, default_continuous};
use crate::error::AppError;
use crate::estimate::KaplanMeier;
use crate::figure::Figure;

pub mod pipeline;

/// Environment variable naming the default input CSV.
pub const DATA_ENV: &str = "KM_DATA";

/// Entry point for the `km` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is fine.
    let _ = dotenvy::dotenv();
    init_logging();

    let cli = crate::cli::Cli::parse();
    match cli.command {
        Command::Plot(args) => handle_plot(args),
        Command::Show(args) => handle_show(args),
        Command::Summary(args) => handle_summary(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    let _ = env_logger::Builder::from_env(env).format_timestamp(None).try_init();
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let dataset = load(&args.data)?;
    let figures = build_figures(&dataset, &args.data)?;

    std::fs::create_dir_all(&args.out_dir).map_err(|e| {
        AppError::runtime(format!("Failed to create output directory '{}': {e}", args.out_dir.display()))
    })?;
    for figure in &figures {
        let path = args.out_dir.join(format!("km_{}.svg", figure.kind));
        crate::render::write_svg(figure, &path)?;
    }

    if !args.no_summary {
        println!("{}", crate::report::format_summary(&figures, chrono::Local::now()));
    }

    if let Some(path) = &args.export {
        crate::io::write_survival_csv(path, &figures)?;
    }

    Ok(())
}

fn handle_show(args: DataArgs) -> Result<(), AppError> {
    let dataset = load(&args)?;
    let figures = build_figures(&dataset, &args)?;
    crate::tui::run(figures)
}

fn handle_summary(args: DataArgs) -> Result<(), AppError> {
    let dataset = load(&args)?;
    let figures = build_figures(&dataset, &args)?;
    println!("{}", crate::report::format_summary(&figures, chrono::Local::now()));
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let rows = crate::data::generate_cohort(args.rows, args.seed)?;
    crate::io::write_cohort_csv(&args.out, &rows)
}

fn load(args: &DataArgs) -> Result<Dataset, AppError> {
    let path = resolve_data_path(args.data.as_deref(), std::env::var(DATA_ENV).ok())?;
    let loaded = crate::io::load_dataset(&path)?;
    if !loaded.row_errors.is_empty() {
        eprint!("{}", crate::report::format_load_summary(&loaded));
    }
    Ok(loaded.dataset)
}

/// `--data` wins over `KM_DATA`.
pub fn resolve_data_path(flag: Option<&Path>, env: Option<String>) -> Result<PathBuf, AppError> {
    match (flag, env) {
        (Some(p), _) => Ok(p.to_path_buf()),
        (None, Some(v)) if !v.trim().is_empty() => Ok(PathBuf::from(v.trim())),
        _ => Err(AppError::input(format!(
            "No input data: pass --data <CSV> or set {DATA_ENV}."
        ))),
    }
}

/// Build the figures requested by `args`, with the heart-failure defaults for
/// any column list left empty.
pub fn build_figures(dataset: &Dataset, args: &DataArgs) -> Result<Vec<Figure>, AppError> {
    let estimator = KaplanMeier::new();
    let mut figures = Vec::with_capacity(2);

    if args.only != Some(FigureKind::Continuous) {
        let columns = categorical_columns(args);
        let mut figure = Figure::categorical();
        pipeline::plot_categorical(dataset, &columns, &estimator, &mut figure)?;
        figures.push(figure);
    }

    if args.only != Some(FigureKind::Categorical) {
        let columns = continuous_columns(args);
        let mut figure = Figure::continuous();
        pipeline::plot_continuous(dataset, &columns, &estimator, &mut figure)?;
        figures.push(figure);
    }

    Ok(figures)
}

fn categorical_columns(args: &DataArgs) -> Vec<String> {
    if args.categorical.is_empty() {
        DEFAULT_CATEGORICAL.iter().map(|s| s.to_string()).collect()
    } else {
        args.categorical.clone()
    }
}

fn continuous_columns(args: &DataArgs) -> Vec<BinnedColumn> {
    if args.continuous.is_empty() {
        default_continuous()
    } else {
        args.continuous.clone()
    }
}
