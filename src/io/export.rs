//! Export survival tables and synthetic cohorts to CSV.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream scripts.

use std::path::Path;

use serde::Serialize;

use crate::data::CohortRow;
use crate::domain::FigureKind;
use crate::error::AppError;
use crate::figure::Figure;

/// One timeline row of one fitted curve.
#[derive(Debug, Clone, Serialize)]
pub struct SurvivalRow<'a> {
    pub figure: FigureKind,
    pub panel: &'a str,
    pub label: &'a str,
    pub time: f64,
    pub at_risk: usize,
    pub observed: usize,
    pub censored: usize,
    pub survival: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

/// Flatten the survival tables of every visible panel.
pub fn survival_rows(figure: &Figure) -> Vec<SurvivalRow<'_>> {
    let mut rows = Vec::new();
    for panel in figure.visible_panels() {
        let name = panel.title.as_deref().unwrap_or("");
        for curve in &panel.curves {
            for i in 0..curve.timeline.len() {
                rows.push(SurvivalRow {
                    figure: figure.kind,
                    panel: name,
                    label: &curve.label,
                    time: curve.timeline[i],
                    at_risk: curve.at_risk[i],
                    observed: curve.observed[i],
                    censored: curve.censored[i],
                    survival: curve.survival[i],
                    ci_lower: curve.ci_lower[i],
                    ci_upper: curve.ci_upper[i],
                });
            }
        }
    }
    rows
}

/// Write the survival tables of `figures` to one CSV file.
pub fn write_survival_csv(path: &Path, figures: &[Figure]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::runtime(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    let mut n = 0usize;
    for figure in figures {
        for row in survival_rows(figure) {
            writer
                .serialize(&row)
                .map_err(|e| AppError::runtime(format!("Failed to write export CSV row: {e}")))?;
            n += 1;
        }
    }
    writer
        .flush()
        .map_err(|e| AppError::runtime(format!("Failed to flush export CSV: {e}")))?;

    log::info!("exported {n} survival rows to '{}'", path.display());
    Ok(())
}

/// Write a synthetic cohort in the same layout `load_dataset` reads.
pub fn write_cohort_csv(path: &Path, rows: &[CohortRow]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::runtime(format!("Failed to create cohort CSV '{}': {e}", path.display())))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::runtime(format!("Failed to write cohort CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::runtime(format!("Failed to flush cohort CSV: {e}")))?;

    log::info!("wrote {} synthetic rows to '{}'", rows.len(), path.display());
    Ok(())
}
