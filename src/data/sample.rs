//! Synthetic heart-failure cohort generation.
//!
//! Produces a seeded, deterministic table with the same schema as the public
//! heart-failure clinical records dataset, so figures can be built without the
//! real data. Covariate marginals are rough matches to the published cohort;
//! survival times come from an exponential hazard that worsens with age, low
//! ejection fraction, high serum creatinine and anaemia, censored by a uniform
//! follow-up window.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{Exp, LogNormal, Normal};
use serde::Serialize;

use crate::data::table::{Column, Dataset};
use crate::domain::{EVENT_COLUMN, TIME_COLUMN};
use crate::error::AppError;

/// Baseline daily hazard for a reference patient.
const BASE_HAZARD: f64 = 0.0011;

/// Follow-up window in days (censoring is uniform inside it).
const FOLLOW_UP_DAYS: (f64, f64) = (4.0, 285.0);

/// One synthetic patient. Field names match the CSV header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortRow {
    pub age: f64,
    pub anaemia: i64,
    pub creatinine_phosphokinase: i64,
    pub diabetes: i64,
    pub ejection_fraction: i64,
    pub high_blood_pressure: i64,
    pub platelets: f64,
    pub serum_creatinine: f64,
    pub serum_sodium: i64,
    pub sex: i64,
    pub smoking: i64,
    pub time: i64,
    #[serde(rename = "DEATH_EVENT")]
    pub death_event: i64,
}

/// Generate `rows` synthetic patients from `seed`.
pub fn generate_cohort(rows: usize, seed: u64) -> Result<Vec<CohortRow>, AppError> {
    if rows == 0 {
        return Err(AppError::input("Cohort size must be > 0."));
    }

    let dist_err = |e: rand_distr::NormalError| AppError::runtime(format!("Sampling distribution error: {e}"));

    let mut rng = StdRng::seed_from_u64(seed);
    let age_dist = Normal::<f64>::new(60.8, 11.9).map_err(dist_err)?;
    let ef_dist = Normal::<f64>::new(38.0, 11.8).map_err(dist_err)?;
    let platelet_dist = Normal::<f64>::new(263_358.0, 97_804.0).map_err(dist_err)?;
    let sodium_dist = Normal::<f64>::new(136.6, 4.4).map_err(dist_err)?;
    let cpk_dist = LogNormal::<f64>::new(5.77, 1.0).map_err(dist_err)?;
    let creatinine_dist = LogNormal::<f64>::new(0.2, 0.4).map_err(dist_err)?;

    let mut out = Vec::with_capacity(rows);
    for _ in 0..rows {
        let age = age_dist.sample(&mut rng).clamp(40.0, 95.0).round();
        let anaemia = i64::from(rng.gen_bool(0.43));
        let creatinine_phosphokinase = cpk_dist.sample(&mut rng).clamp(23.0, 7861.0).round() as i64;
        let diabetes = i64::from(rng.gen_bool(0.42));
        let ejection_fraction = ef_dist.sample(&mut rng).clamp(14.0, 80.0).round() as i64;
        let high_blood_pressure = i64::from(rng.gen_bool(0.35));
        let platelets = platelet_dist.sample(&mut rng).clamp(25_100.0, 850_000.0).round();
        let serum_creatinine = (creatinine_dist.sample(&mut rng).clamp(0.5, 9.4) * 100.0).round() / 100.0;
        let serum_sodium = sodium_dist.sample(&mut rng).clamp(113.0, 148.0).round() as i64;
        let sex = i64::from(rng.gen_bool(0.65));
        let smoking = i64::from(rng.gen_bool(0.32));

        let log_risk = 0.045 * (age - 60.0) - 0.05 * (ejection_fraction as f64 - 38.0)
            + 0.45 * (serum_creatinine - 1.1)
            + 0.3 * anaemia as f64
            + 0.2 * high_blood_pressure as f64;
        let hazard = BASE_HAZARD * log_risk.exp();
        let event_time = Exp::new(hazard)
            .map_err(|e| AppError::runtime(format!("Sampling distribution error: {e}")))?
            .sample(&mut rng);
        let censor_time = rng.gen_range(FOLLOW_UP_DAYS.0..=FOLLOW_UP_DAYS.1);

        let (time, death_event) = if event_time <= censor_time {
            (event_time, 1)
        } else {
            (censor_time, 0)
        };

        out.push(CohortRow {
            age,
            anaemia,
            creatinine_phosphokinase,
            diabetes,
            ejection_fraction,
            high_blood_pressure,
            platelets,
            serum_creatinine,
            serum_sodium,
            sex,
            smoking,
            time: (time.round() as i64).max(1),
            death_event,
        });
    }

    log::debug!(
        "generated {rows} synthetic patients (seed={seed}, events={})",
        out.iter().filter(|r| r.death_event == 1).count()
    );

    Ok(out)
}

/// Convert generated rows into a `Dataset`.
pub fn cohort_dataset(rows: &[CohortRow]) -> Result<Dataset, AppError> {
    let ints = |f: fn(&CohortRow) -> i64| rows.iter().map(f).collect::<Vec<_>>();
    let floats = |f: fn(&CohortRow) -> f64| rows.iter().map(f).collect::<Vec<_>>();

    Dataset::from_columns(vec![
        Column::float("age", floats(|r| r.age)),
        Column::integer("anaemia", ints(|r| r.anaemia)),
        Column::integer("creatinine_phosphokinase", ints(|r| r.creatinine_phosphokinase)),
        Column::integer("diabetes", ints(|r| r.diabetes)),
        Column::integer("ejection_fraction", ints(|r| r.ejection_fraction)),
        Column::integer("high_blood_pressure", ints(|r| r.high_blood_pressure)),
        Column::float("platelets", floats(|r| r.platelets)),
        Column::float("serum_creatinine", floats(|r| r.serum_creatinine)),
        Column::integer("serum_sodium", ints(|r| r.serum_sodium)),
        Column::integer("sex", ints(|r| r.sex)),
        Column::integer("smoking", ints(|r| r.smoking)),
        Column::integer(TIME_COLUMN, ints(|r| r.time)),
        Column::integer(EVENT_COLUMN, ints(|r| r.death_event)),
    ])
}
