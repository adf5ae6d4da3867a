//! Kaplan-Meier product-limit estimator.
//!
//! The survival function is estimated on the timeline of every distinct
//! observed duration (events and censorings), starting at `t = 0`:
//!
//! `S(t) = Π_{t_i <= t} (1 - d_i / n_i)`
//!
//! where `d_i` is the number of events at `t_i` and `n_i` the number of subjects
//! still at risk just before `t_i`.
//!
//! The pointwise confidence band uses Greenwood's variance under the
//! log(-log) transform, which keeps the band inside `[0, 1]`:
//!
//! `V(t) = Σ_{t_i <= t} d_i / (n_i (n_i - d_i))`
//! `bounds = exp(-exp(log(-log S) ± z √V / log S))`

use crate::error::AppError;

use super::{Estimator, FittedCurve};

/// Two-sided 95% standard normal quantile.
pub const Z_95: f64 = 1.959_963_984_540_054;

/// Kaplan-Meier estimator with a log(-log) Greenwood confidence band.
#[derive(Debug, Clone, Copy)]
pub struct KaplanMeier {
    z: f64,
}

impl Default for KaplanMeier {
    fn default() -> Self {
        Self { z: Z_95 }
    }
}

impl KaplanMeier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Estimator for KaplanMeier {
    fn fit(&self, durations: &[f64], events: &[bool], label: String) -> Result<FittedCurve, AppError> {
        if durations.len() != events.len() {
            return Err(AppError::input(format!(
                "`{label}`: durations ({}) and events ({}) differ in length.",
                durations.len(),
                events.len()
            )));
        }
        if durations.is_empty() {
            return Err(AppError::data(format!("`{label}`: cannot fit a curve on zero subjects.")));
        }
        if let Some(bad) = durations.iter().find(|t| !t.is_finite() || **t < 0.0) {
            return Err(AppError::input(format!(
                "`{label}`: durations must be finite and non-negative (found {bad})."
            )));
        }

        let mut pairs: Vec<(f64, bool)> = durations.iter().copied().zip(events.iter().copied()).collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let total = pairs.len();
        let mut curve = FittedCurve {
            label,
            timeline: vec![0.0],
            survival: vec![1.0],
            ci_lower: vec![1.0],
            ci_upper: vec![1.0],
            at_risk: vec![total],
            observed: vec![0],
            censored: vec![0],
        };

        let mut survival = 1.0;
        let mut greenwood = 0.0;
        let mut at_risk = total;

        let mut i = 0;
        while i < pairs.len() {
            let t = pairs[i].0;
            let mut deaths = 0usize;
            let mut removed = 0usize;
            while i < pairs.len() && pairs[i].0 == t {
                if pairs[i].1 {
                    deaths += 1;
                }
                removed += 1;
                i += 1;
            }

            if deaths > 0 {
                let n = at_risk as f64;
                let d = deaths as f64;
                survival *= 1.0 - d / n;
                greenwood = if deaths < at_risk {
                    greenwood + d / (n * (n - d))
                } else {
                    f64::INFINITY
                };
            }
            let (lower, upper) = log_log_band(survival, greenwood, self.z);

            // Subjects at t = 0 fold into the initial row.
            if t == 0.0 {
                curve.survival[0] = survival;
                curve.ci_lower[0] = lower;
                curve.ci_upper[0] = upper;
                curve.observed[0] = deaths;
                curve.censored[0] = removed - deaths;
            } else {
                curve.timeline.push(t);
                curve.survival.push(survival);
                curve.ci_lower.push(lower);
                curve.ci_upper.push(upper);
                curve.at_risk.push(at_risk);
                curve.observed.push(deaths);
                curve.censored.push(removed - deaths);
            }

            at_risk -= removed;
        }

        Ok(curve)
    }
}

/// Confidence bounds for `s` given the accumulated Greenwood sum.
fn log_log_band(s: f64, greenwood: f64, z: f64) -> (f64, f64) {
    if s >= 1.0 {
        return (1.0, 1.0);
    }
    if s <= 0.0 || !greenwood.is_finite() {
        return (0.0, 0.0);
    }

    let log_s = s.ln();
    let spread = z * greenwood.sqrt() / log_s;
    let center = (-log_s).ln();
    let a = (-(center + spread).exp()).exp();
    let b = (-(center - spread).exp()).exp();
    (a.min(b), a.max(b))
}
