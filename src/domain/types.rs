//! Shared domain types.
//!
//! These types describe *what* to stratify and *how* a figure is laid out. They
//! carry no data of their own, so the CLI, the pipeline and the renderers can all
//! share them without coupling to each other.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Serialize;

use crate::error::AppError;

/// Name of the duration column every dataset must carry.
pub const TIME_COLUMN: &str = "time";

/// Name of the event-indicator column every dataset must carry.
pub const EVENT_COLUMN: &str = "DEATH_EVENT";

/// How a continuous column is cut into bins.
#[derive(Debug, Clone, PartialEq)]
pub enum BinSpec {
    /// Explicit cut points; bin `i` is `(edges[i], edges[i + 1]]`.
    Edges(Vec<f64>),
    /// Number of equal-width bins spanning the observed range.
    Count(usize),
}

impl BinSpec {
    /// Reject specs that cannot produce at least one bin.
    pub fn validate(&self) -> Result<(), AppError> {
        match self {
            BinSpec::Count(0) => Err(AppError::input("Bin count must be at least 1.")),
            BinSpec::Count(_) => Ok(()),
            BinSpec::Edges(edges) => {
                if edges.len() < 2 {
                    return Err(AppError::input(format!(
                        "Bin edges need at least two cut points, got {}.",
                        edges.len()
                    )));
                }
                if edges.iter().any(|e| !e.is_finite()) {
                    return Err(AppError::input("Bin edges must be finite."));
                }
                if edges.windows(2).any(|w| w[1] <= w[0]) {
                    return Err(AppError::input(format!(
                        "Bin edges must be strictly increasing: {edges:?}"
                    )));
                }
                Ok(())
            }
        }
    }
}

impl FromStr for BinSpec {
    type Err = AppError;

    /// `"3"` is a bin count, `"30,60,80,100"` is a list of cut points.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !s.contains(',') {
            if let Ok(k) = s.parse::<usize>() {
                let spec = BinSpec::Count(k);
                spec.validate()?;
                return Ok(spec);
            }
        }

        let edges = s
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<f64>()
                    .map_err(|_| AppError::input(format!("Invalid cut point '{}' in '{s}'.", part.trim())))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let spec = BinSpec::Edges(edges);
        spec.validate()?;
        Ok(spec)
    }
}

/// A continuous column paired with its own bin spec.
#[derive(Debug, Clone, PartialEq)]
pub struct BinnedColumn {
    pub column: String,
    pub bins: BinSpec,
}

impl BinnedColumn {
    pub fn new(column: impl Into<String>, bins: BinSpec) -> Self {
        Self {
            column: column.into(),
            bins,
        }
    }
}

impl FromStr for BinnedColumn {
    type Err = AppError;

    /// Parse `name=SPEC` (see [`BinSpec::from_str`]).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, spec) = s
            .split_once('=')
            .ok_or_else(|| AppError::input(format!("Expected `column=SPEC`, got '{s}'.")))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::input(format!("Missing column name in '{s}'.")));
        }
        Ok(Self::new(name, spec.parse()?))
    }
}

/// Which stratification a figure shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FigureKind {
    Categorical,
    Continuous,
}

impl FigureKind {
    pub fn display_name(self) -> &'static str {
        match self {
            FigureKind::Categorical => "categorical",
            FigureKind::Continuous => "continuous",
        }
    }
}

impl fmt::Display for FigureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Grid shape and pixel size of a figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FigureLayout {
    pub rows: usize,
    pub cols: usize,
    pub width: u32,
    pub height: u32,
}

impl FigureLayout {
    /// 2x3 grid used for categorical covariates.
    pub const CATEGORICAL: FigureLayout = FigureLayout {
        rows: 2,
        cols: 3,
        width: 1800,
        height: 1000,
    };

    /// 3x3 grid used for binned continuous covariates.
    pub const CONTINUOUS: FigureLayout = FigureLayout {
        rows: 3,
        cols: 3,
        width: 1800,
        height: 1500,
    };

    pub fn capacity(&self) -> usize {
        self.rows * self.cols
    }
}

/// Axis and band settings shared by every panel of a figure.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelStyle {
    pub x_label: String,
    pub y_label: String,
    /// Time domain shown on the x axis.
    pub x_range: (f64, f64),
    /// Probability range shown on the y axis.
    pub y_range: (f64, f64),
    /// Fill opacity of the confidence band.
    pub ci_alpha: f64,
}

impl Default for PanelStyle {
    fn default() -> Self {
        Self {
            x_label: "Days".to_string(),
            y_label: "Survival Probability".to_string(),
            x_range: (0.0, 290.0),
            y_range: (0.0, 1.1),
            ci_alpha: 0.1,
        }
    }
}

/// Categorical covariates of the heart-failure clinical records dataset.
pub const DEFAULT_CATEGORICAL: [&str; 5] = ["anaemia", "diabetes", "high_blood_pressure", "sex", "smoking"];

/// Continuous covariates of the heart-failure dataset with their usual cuts.
pub fn default_continuous() -> Vec<BinnedColumn> {
    vec![
        BinnedColumn::new("age", BinSpec::Edges(vec![30.0, 60.0, 80.0, 100.0])),
        BinnedColumn::new("creatinine_phosphokinase", BinSpec::Count(3)),
        BinnedColumn::new("ejection_fraction", BinSpec::Edges(vec![0.0, 30.0, 45.0, 100.0])),
        BinnedColumn::new("platelets", BinSpec::Count(3)),
        BinnedColumn::new("serum_creatinine", BinSpec::Count(3)),
        BinnedColumn::new("serum_sodium", BinSpec::Count(3)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bin_count() {
        assert_eq!("3".parse::<BinSpec>().unwrap(), BinSpec::Count(3));
    }

    #[test]
    fn parses_cut_points() {
        let spec: BinSpec = "30, 60,80,100".parse().unwrap();
        assert_eq!(spec, BinSpec::Edges(vec![30.0, 60.0, 80.0, 100.0]));
    }

    #[test]
    fn rejects_bad_specs() {
        assert!("0".parse::<BinSpec>().is_err());
        assert!("10,5".parse::<BinSpec>().is_err());
        assert!("1.5".parse::<BinSpec>().is_err());
        assert!("a,b".parse::<BinSpec>().is_err());
    }

    #[test]
    fn parses_binned_column() {
        let col: BinnedColumn = "age=30,60,80,100".parse().unwrap();
        assert_eq!(col.column, "age");
        assert_eq!(col.bins, BinSpec::Edges(vec![30.0, 60.0, 80.0, 100.0]));

        assert!("age".parse::<BinnedColumn>().is_err());
        assert!("=3".parse::<BinnedColumn>().is_err());
    }

    #[test]
    fn layouts_have_expected_capacity() {
        assert_eq!(FigureLayout::CATEGORICAL.capacity(), 6);
        assert_eq!(FigureLayout::CONTINUOUS.capacity(), 9);
    }
}
