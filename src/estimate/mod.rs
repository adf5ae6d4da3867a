//! Survival curve estimation.
//!
//! The stratification pipeline only talks to the [`Estimator`] trait: it hands
//! over a subgroup's durations and event flags plus a label, and gets back a
//! [`FittedCurve`] that knows how to describe itself as panel geometry.
//!
//! [`KaplanMeier`] is the estimator used by the CLI.

pub mod kaplan_meier;

pub use kaplan_meier::KaplanMeier;

use crate::error::AppError;

/// Fits one survival curve per subgroup.
pub trait Estimator {
    fn fit(&self, durations: &[f64], events: &[bool], label: String) -> Result<FittedCurve, AppError>;
}

/// A fitted survival step function with its confidence band.
///
/// All vectors are parallel to `timeline`, which starts at `0` and lists every
/// distinct observed duration in ascending order.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedCurve {
    pub label: String,
    pub timeline: Vec<f64>,
    pub survival: Vec<f64>,
    pub ci_lower: Vec<f64>,
    pub ci_upper: Vec<f64>,
    /// Subjects at risk just before each timeline point.
    pub at_risk: Vec<usize>,
    /// Events observed at each timeline point.
    pub observed: Vec<usize>,
    /// Censorings at each timeline point.
    pub censored: Vec<usize>,
}

impl FittedCurve {
    pub fn n_subjects(&self) -> usize {
        self.at_risk.first().copied().unwrap_or(0)
    }

    pub fn n_events(&self) -> usize {
        self.observed.iter().sum()
    }

    /// Survival probability at `t` (step function, right-continuous).
    pub fn survival_at(&self, t: f64) -> f64 {
        step_value(&self.timeline, &self.survival, t).unwrap_or(1.0)
    }

    /// Smallest time at which survival drops to 0.5 or below.
    pub fn median_survival(&self) -> Option<f64> {
        self.survival
            .iter()
            .position(|&s| s <= 0.5)
            .map(|i| self.timeline[i])
    }

    /// Post-step polyline of the estimate, clipped to `domain`.
    pub fn steps(&self, domain: (f64, f64)) -> Vec<(f64, f64)> {
        step_path(&self.timeline, &self.survival, domain)
    }

    /// Closed polygon of the confidence band, clipped to `domain`.
    pub fn band(&self, domain: (f64, f64)) -> Vec<(f64, f64)> {
        let mut upper = step_path(&self.timeline, &self.ci_upper, domain);
        let lower = step_path(&self.timeline, &self.ci_lower, domain);
        upper.extend(lower.into_iter().rev());
        upper
    }
}

fn step_value(timeline: &[f64], values: &[f64], t: f64) -> Option<f64> {
    let idx = timeline.partition_point(|&x| x <= t);
    if idx == 0 { None } else { Some(values[idx - 1]) }
}

fn step_path(timeline: &[f64], values: &[f64], (x0, x1): (f64, f64)) -> Vec<(f64, f64)> {
    let (Some(&first), Some(&last)) = (timeline.first(), timeline.last()) else {
        return Vec::new();
    };
    let start = x0.max(first);
    let end = x1.min(last);
    if end < start {
        return Vec::new();
    }

    let mut path = vec![(start, step_value(timeline, values, start).unwrap_or(values[0]))];
    for i in 1..timeline.len() {
        let t = timeline[i];
        if t <= start {
            continue;
        }
        if t > end {
            break;
        }
        path.push((t, values[i - 1]));
        path.push((t, values[i]));
    }

    if let Some(&(x, y)) = path.last() {
        if x < end {
            path.push((end, y));
        }
    }
    path
}
