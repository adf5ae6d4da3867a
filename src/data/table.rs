//! In-memory clinical table.
//!
//! A `Dataset` is a set of equally long, typed columns looked up by name. Two
//! columns have fixed roles (`time` and `DEATH_EVENT`); everything else is a
//! feature that can be stratified on.

use std::collections::HashMap;

use crate::domain::{EVENT_COLUMN, TIME_COLUMN};
use crate::error::AppError;

/// Typed storage for one column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Integer(Vec<i64>),
    Float(Vec<f64>),
    Text(Vec<String>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Integer(v) => v.len(),
            ColumnValues::Float(v) => v.len(),
            ColumnValues::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Infer the narrowest type that fits every cell: integer, then float, then text.
    pub fn infer(cells: Vec<String>) -> Self {
        if let Some(ints) = cells.iter().map(|c| c.parse::<i64>().ok()).collect::<Option<Vec<_>>>() {
            return ColumnValues::Integer(ints);
        }
        if let Some(floats) = cells
            .iter()
            .map(|c| c.parse::<f64>().ok().filter(|v| v.is_finite()))
            .collect::<Option<Vec<_>>>()
        {
            return ColumnValues::Float(floats);
        }
        ColumnValues::Text(cells)
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: ColumnValues,
}

impl Column {
    pub fn integer(name: impl Into<String>, values: Vec<i64>) -> Self {
        Self {
            name: name.into(),
            values: ColumnValues::Integer(values),
        }
    }

    pub fn float(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values: ColumnValues::Float(values),
        }
    }

    pub fn text(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            values: ColumnValues::Text(values),
        }
    }

    /// Numeric view of the column; text columns are rejected.
    pub fn to_f64(&self) -> Result<Vec<f64>, AppError> {
        match &self.values {
            ColumnValues::Integer(v) => Ok(v.iter().map(|&x| x as f64).collect()),
            ColumnValues::Float(v) => Ok(v.clone()),
            ColumnValues::Text(_) => Err(AppError::input(format!(
                "Column `{}` is not numeric.",
                self.name
            ))),
        }
    }
}

/// A validated table with `time` and `DEATH_EVENT` columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    index: HashMap<String, usize>,
    n_rows: usize,
    durations: Vec<f64>,
    events: Vec<bool>,
}

impl Dataset {
    /// Build a dataset from columns, validating lengths and the fixed-role columns.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, AppError> {
        let mut index = HashMap::with_capacity(columns.len());
        for (i, col) in columns.iter().enumerate() {
            if index.insert(col.name.clone(), i).is_some() {
                return Err(AppError::input(format!("Duplicate column: `{}`", col.name)));
            }
        }

        let n_rows = columns.first().map(|c| c.values.len()).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.values.len() != n_rows) {
            return Err(AppError::input(format!(
                "Column `{}` has {} rows, expected {n_rows}.",
                bad.name,
                bad.values.len()
            )));
        }

        let mut data = Self {
            columns,
            index,
            n_rows,
            durations: Vec::new(),
            events: Vec::new(),
        };

        data.durations = data.column(TIME_COLUMN)?.to_f64()?;
        if let Some(bad) = data.durations.iter().find(|t| !t.is_finite() || **t < 0.0) {
            return Err(AppError::input(format!(
                "`{TIME_COLUMN}` must be finite and non-negative (found {bad})."
            )));
        }

        data.events = data
            .column(EVENT_COLUMN)?
            .to_f64()?
            .into_iter()
            .map(|v| parse_event(v).ok_or_else(|| {
                AppError::input(format!("`{EVENT_COLUMN}` must be 0 or 1 (found {v})."))
            }))
            .collect::<Result<_, _>>()?;

        if n_rows == 0 {
            return Err(AppError::data("Dataset has no rows."));
        }

        Ok(data)
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Result<&Column, AppError> {
        self.index
            .get(name)
            .map(|&i| &self.columns[i])
            .ok_or_else(|| AppError::input(format!("Unknown column: `{name}`")))
    }

    /// Durations of every row.
    pub fn durations(&self) -> &[f64] {
        &self.durations
    }

    /// Event indicators of every row (true = event observed).
    pub fn events(&self) -> &[bool] {
        &self.events
    }

    /// Durations and events restricted to `rows`.
    pub fn select(&self, rows: &[usize]) -> (Vec<f64>, Vec<bool>) {
        let durations = rows.iter().map(|&i| self.durations[i]).collect();
        let events = rows.iter().map(|&i| self.events[i]).collect();
        (durations, events)
    }
}

fn parse_event(v: f64) -> Option<bool> {
    if v == 0.0 {
        Some(false)
    } else if v == 1.0 {
        Some(true)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> Dataset {
        Dataset::from_columns(vec![
            Column::float(TIME_COLUMN, vec![4.0, 6.0, 10.0]),
            Column::integer(EVENT_COLUMN, vec![1, 0, 1]),
            Column::text("group", vec!["a".into(), "b".into(), "a".into()]),
        ])
        .unwrap()
    }

    #[test]
    fn exposes_roles() {
        let data = tiny();
        assert_eq!(data.n_rows(), 3);
        assert_eq!(data.durations(), &[4.0, 6.0, 10.0]);
        assert_eq!(data.events(), &[true, false, true]);
        assert_eq!(data.select(&[2, 0]), (vec![10.0, 4.0], vec![true, true]));
    }

    #[test]
    fn missing_role_column_fails() {
        let err = Dataset::from_columns(vec![Column::float(TIME_COLUMN, vec![1.0])]).unwrap_err();
        assert!(err.message().contains(EVENT_COLUMN));
    }

    #[test]
    fn rejects_non_binary_events_and_negative_times() {
        let bad_event = Dataset::from_columns(vec![
            Column::float(TIME_COLUMN, vec![1.0]),
            Column::integer(EVENT_COLUMN, vec![2]),
        ]);
        assert!(bad_event.is_err());

        let bad_time = Dataset::from_columns(vec![
            Column::float(TIME_COLUMN, vec![-1.0]),
            Column::integer(EVENT_COLUMN, vec![1]),
        ]);
        assert!(bad_time.is_err());
    }

    #[test]
    fn rejects_ragged_columns() {
        let err = Dataset::from_columns(vec![
            Column::float(TIME_COLUMN, vec![1.0, 2.0]),
            Column::integer(EVENT_COLUMN, vec![1]),
        ])
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn text_columns_are_not_numeric() {
        let data = tiny();
        assert!(data.column("group").unwrap().to_f64().is_err());
        assert!(data.column("nope").is_err());
    }

    #[test]
    fn infers_column_types() {
        let ints = ColumnValues::infer(vec!["1".into(), "0".into()]);
        assert_eq!(ints, ColumnValues::Integer(vec![1, 0]));

        let floats = ColumnValues::infer(vec!["1".into(), "2.5".into()]);
        assert_eq!(floats, ColumnValues::Float(vec![1.0, 2.5]));

        let text = ColumnValues::infer(vec!["1".into(), "x".into()]);
        assert!(matches!(text, ColumnValues::Text(_)));
    }
}
