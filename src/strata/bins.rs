//! Cutting a numeric column into bins.
//!
//! Bins are right-closed intervals `(lo, hi]`. With an explicit list of cut
//! points, values at or below the first edge (or above the last) fall in no bin.
//! With a bin count, edges are spread evenly over the observed range and the
//! first edge is nudged left by 0.1% of the range so the minimum is included.

use crate::domain::BinSpec;
use crate::error::AppError;

/// Fraction of the range used to widen the outer edge(s).
const EDGE_NUDGE: f64 = 0.001;

/// Smallest number of decimal places kept when printing an edge.
const LABEL_PRECISION: i32 = 3;

/// Labels never use more decimals than this.
const MAX_LABEL_PRECISION: i32 = 20;

/// Resolved bin edges for one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Bins {
    edges: Vec<f64>,
    /// Decimals used for every label of this column.
    precision: i32,
}

impl Bins {
    /// Resolve `spec` against the observed `values`.
    pub fn resolve(spec: &BinSpec, values: &[f64]) -> Result<Self, AppError> {
        spec.validate()?;
        match spec {
            BinSpec::Edges(edges) => Ok(Self::from_edges(edges.clone())),
            BinSpec::Count(k) => equal_width(*k, values).map(Self::from_edges),
        }
    }

    fn from_edges(edges: Vec<f64>) -> Self {
        let precision = label_precision(&edges);
        Self { edges, precision }
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index of the bin containing `value`, if any.
    pub fn locate(&self, value: f64) -> Option<usize> {
        let first = *self.edges.first()?;
        let last = *self.edges.last()?;
        if !(value > first && value <= last) {
            return None;
        }
        // First edge >= value closes the bin on the right.
        let right = self.edges.partition_point(|&e| e < value);
        Some(right - 1)
    }

    /// Half-open label of bin `i`, e.g. `"30.0 - 60.0)"`.
    pub fn label(&self, i: usize) -> String {
        format!(
            "{} - {})",
            format_edge(self.edges[i], self.precision),
            format_edge(self.edges[i + 1], self.precision)
        )
    }
}

fn equal_width(k: usize, values: &[f64]) -> Result<Vec<f64>, AppError> {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if !(min.is_finite() && max.is_finite()) {
        return Err(AppError::data("Cannot bin a column without finite values."));
    }

    let (lo, hi) = if min == max {
        let pad = |v: f64| if v == 0.0 { EDGE_NUDGE } else { v.abs() * EDGE_NUDGE };
        (min - pad(min), max + pad(max))
    } else {
        (min, max)
    };

    let step = (hi - lo) / k as f64;
    let mut edges: Vec<f64> = (0..=k).map(|i| lo + step * i as f64).collect();
    edges[k] = hi;
    if min != max {
        edges[0] -= (max - min) * EDGE_NUDGE;
    }

    Ok(edges)
}

/// Fewest decimals (at least three) at which every rounded edge is distinct.
fn label_precision(edges: &[f64]) -> i32 {
    (LABEL_PRECISION..MAX_LABEL_PRECISION)
        .find(|&p| {
            let rounded: Vec<f64> = edges.iter().map(|&e| round_edge(e, p)).collect();
            rounded.windows(2).all(|w| w[0] != w[1])
        })
        .unwrap_or(LABEL_PRECISION)
}

/// Print an edge rounded to `precision` decimals (significant fractional
/// digits below one), in shortest form with at least one decimal.
pub fn format_edge(value: f64, precision: i32) -> String {
    format!("{:?}", round_edge(value, precision))
}

fn round_edge(value: f64, precision: i32) -> f64 {
    if !value.is_finite() || value == 0.0 {
        return value;
    }
    let digits = if value.trunc() == 0.0 {
        -(value.fract().abs().log10().floor() as i32) - 1 + precision
    } else {
        precision
    };
    let scale = 10f64.powi(digits);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_edges_are_right_closed() {
        let bins = Bins::resolve(&BinSpec::Edges(vec![30.0, 60.0, 80.0, 100.0]), &[]).unwrap();
        assert_eq!(bins.len(), 3);
        assert_eq!(bins.locate(30.0), None);
        assert_eq!(bins.locate(30.5), Some(0));
        assert_eq!(bins.locate(60.0), Some(0));
        assert_eq!(bins.locate(60.1), Some(1));
        assert_eq!(bins.locate(100.0), Some(2));
        assert_eq!(bins.locate(100.5), None);
    }

    #[test]
    fn explicit_labels() {
        let bins = Bins::resolve(&BinSpec::Edges(vec![30.0, 60.0, 80.0, 100.0]), &[]).unwrap();
        let labels: Vec<String> = (0..bins.len()).map(|i| bins.label(i)).collect();
        assert_eq!(labels, vec!["30.0 - 60.0)", "60.0 - 80.0)", "80.0 - 100.0)"]);
    }

    #[test]
    fn count_bins_cover_observed_range() {
        let values = [40.0, 55.0, 70.0, 95.0];
        let bins = Bins::resolve(&BinSpec::Count(3), &values).unwrap();
        assert_eq!(bins.len(), 3);
        assert!((bins.edges()[0] - (40.0 - 0.055)).abs() < 1e-12);
        assert!((bins.edges()[1] - 58.333_333_333_333_336).abs() < 1e-9);
        assert_eq!(bins.edges()[3], 95.0);

        for v in values {
            assert!(bins.locate(v).is_some(), "{v} fell outside every bin");
        }
        assert_eq!(bins.locate(40.0), Some(0));
        assert_eq!(bins.locate(95.0), Some(2));
        assert_eq!(bins.label(0), "39.945 - 58.333)");
    }

    #[test]
    fn constant_column_still_bins() {
        let bins = Bins::resolve(&BinSpec::Count(2), &[5.0, 5.0]).unwrap();
        assert_eq!(bins.len(), 2);
        assert!(bins.locate(5.0).is_some());

        let zeros = Bins::resolve(&BinSpec::Count(1), &[0.0]).unwrap();
        assert_eq!(zeros.edges(), &[-0.001, 0.001]);
    }

    #[test]
    fn formats_edges_like_interval_labels() {
        assert_eq!(format_edge(30.0, 3), "30.0");
        assert_eq!(format_edge(0.0, 3), "0.0");
        assert_eq!(format_edge(58.333_333, 3), "58.333");
        assert_eq!(format_edge(0.001_234_5, 3), "0.00123");
        assert_eq!(format_edge(263_358.0, 3), "263358.0");
    }

    #[test]
    fn close_edges_get_extra_decimals() {
        let values = [1.0001, 1.0002, 1.0003, 1.0004];
        let bins = Bins::resolve(&BinSpec::Count(3), &values).unwrap();
        let labels: Vec<String> = (0..bins.len()).map(|i| bins.label(i)).collect();

        assert_eq!(labels.len(), 3);
        assert_ne!(labels[0], labels[1]);
        assert_ne!(labels[1], labels[2]);
        assert!(labels[2].ends_with(" - 1.0004)"), "{labels:?}");
    }

    #[test]
    fn wide_edges_keep_three_decimals() {
        let bins = Bins::resolve(&BinSpec::Edges(vec![0.0, 30.0, 45.0, 100.0]), &[]).unwrap();
        assert_eq!(bins.label(1), "30.0 - 45.0)");
    }

    fn label_edges(label: &str) -> (String, String) {
        let (lo, hi) = label.split_once(" - ").unwrap();
        (lo.to_string(), hi.trim_end_matches(')').to_string())
    }

    #[test]
    fn count_labels_chain_and_bracket_the_data() {
        let values = [45.0, 62.0, 75.0, 59.9, 81.0, 90.0, 60.0, 50.0, 65.0, 99.0];
        for k in [2, 3, 5] {
            let bins = Bins::resolve(&BinSpec::Count(k), &values).unwrap();
            let edges: Vec<(String, String)> = (0..bins.len()).map(|i| label_edges(&bins.label(i))).collect();

            for pair in edges.windows(2) {
                assert_eq!(pair[0].1, pair[1].0, "gap or overlap with k={k}");
            }
            let first: f64 = edges[0].0.parse().unwrap();
            let last: f64 = edges[k - 1].1.parse().unwrap();
            assert!(first < 45.0, "k={k}: lower edge {first}");
            assert!(last >= 99.0, "k={k}: upper edge {last}");
            assert!(bins.edges()[0] < 45.0 && bins.edges()[k] >= 99.0);
        }
    }
}
