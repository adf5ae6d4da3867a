//! CSV ingest and validation.
//!
//! Turns a clinical CSV export into a typed `Dataset`.
//!
//! Design goals:
//! - **Strict schema** for the fixed-role columns (`time`, `DEATH_EVENT`)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **No stratification logic here**: column types are inferred, nothing else

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::data::{Column, ColumnValues, Dataset};
use crate::domain::{EVENT_COLUMN, TIME_COLUMN};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: the dataset plus what was skipped on the way.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub dataset: Dataset,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load a CSV file into a `Dataset`.
pub fn load_dataset(path: &Path) -> Result<LoadedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;
    let loaded = read_dataset(file)?;

    log::info!(
        "loaded '{}': {} rows read, {} used, {} skipped",
        path.display(),
        loaded.rows_read,
        loaded.rows_used,
        loaded.row_errors.len()
    );
    Ok(loaded)
}

/// Read a CSV stream into a `Dataset`.
pub fn read_dataset<R: Read>(reader: R) -> Result<LoadedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let names: Vec<String> = headers.iter().map(normalize_header_name).collect();
    let header_map = build_header_map(&names)?;

    let time_idx = required_index(&header_map, TIME_COLUMN)?;
    let event_idx = required_index(&header_map, EVENT_COLUMN)?;

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); names.len()];
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header line; CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        if let Err(message) = validate_row(&record, &names, time_idx, event_idx) {
            log::warn!("skipping line {line}: {message}");
            row_errors.push(RowError { line, message });
            continue;
        }

        for (col, value) in cells.iter_mut().zip(record.iter()) {
            col.push(value.to_string());
        }
    }

    let rows_used = cells.first().map(Vec::len).unwrap_or(0);
    if rows_used == 0 {
        return Err(AppError::data("No valid rows remain after validation."));
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column {
            name,
            values: ColumnValues::infer(values),
        })
        .collect();

    Ok(LoadedData {
        dataset: Dataset::from_columns(columns)?,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    // Column names are otherwise case-sensitive (`DEATH_EVENT`).
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn build_header_map(names: &[String]) -> Result<HashMap<&str, usize>, AppError> {
    let mut map = HashMap::with_capacity(names.len());
    for (idx, name) in names.iter().enumerate() {
        if name.is_empty() {
            return Err(AppError::input(format!("Empty column name at position {}.", idx + 1)));
        }
        if map.insert(name.as_str(), idx).is_some() {
            return Err(AppError::input(format!("Duplicate column: `{name}`")));
        }
    }
    Ok(map)
}

fn required_index(header_map: &HashMap<&str, usize>, name: &str) -> Result<usize, AppError> {
    header_map
        .get(name)
        .copied()
        .ok_or_else(|| AppError::input(format!("Missing required column: `{name}`")))
}

fn validate_row(record: &StringRecord, names: &[String], time_idx: usize, event_idx: usize) -> Result<(), String> {
    if record.len() != names.len() {
        return Err(format!("expected {} fields, found {}", names.len(), record.len()));
    }
    if let Some((name, _)) = names.iter().zip(record.iter()).find(|(_, v)| v.is_empty()) {
        return Err(format!("missing value for `{name}`"));
    }

    let time = &record[time_idx];
    match time.parse::<f64>() {
        Ok(t) if t.is_finite() && t >= 0.0 => {}
        _ => return Err(format!("invalid `{TIME_COLUMN}` value '{time}'")),
    }

    let event = &record[event_idx];
    match event.parse::<f64>() {
        Ok(v) if v == 0.0 || v == 1.0 => {}
        _ => return Err(format!("invalid `{EVENT_COLUMN}` value '{event}' (expected 0 or 1)")),
    }

    Ok(())
}
