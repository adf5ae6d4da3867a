//! Stratified Kaplan-Meier figure building, shared by every front-end.
//!
//! Both entry points follow the same flow:
//! dataset -> subgroups -> one fitted curve per subgroup -> one panel per column
//!
//! The figure is owned by the caller and only modified once every column has
//! been fitted, so a failure leaves it untouched.

use crate::data::Dataset;
use crate::domain::BinnedColumn;
use crate::error::AppError;
use crate::estimate::{Estimator, FittedCurve};
use crate::figure::Figure;
use crate::strata::{self, Subgroup};

/// Fill `figure` with one panel per categorical column.
///
/// Each distinct value of a column becomes one curve labelled `"<column>: <value>"`.
pub fn plot_categorical<E: Estimator>(
    data: &Dataset,
    columns: &[String],
    estimator: &E,
    figure: &mut Figure,
) -> Result<(), AppError> {
    figure.ensure_capacity(columns.len())?;

    let mut features = Vec::with_capacity(columns.len());
    for column in columns {
        let groups = strata::by_category(data, column)?;
        features.push((column.clone(), fit_groups(data, groups, estimator)?));
    }

    figure.compose(features)
}

/// Fill `figure` with one panel per binned continuous column.
///
/// Each populated bin becomes one curve labelled with its range, e.g. `"30.0 - 60.0)"`.
pub fn plot_continuous<E: Estimator>(
    data: &Dataset,
    columns: &[BinnedColumn],
    estimator: &E,
    figure: &mut Figure,
) -> Result<(), AppError> {
    figure.ensure_capacity(columns.len())?;

    let mut features = Vec::with_capacity(columns.len());
    for binned in columns {
        let groups = strata::by_bins(data, &binned.column, &binned.bins)?;
        features.push((binned.column.clone(), fit_groups(data, groups, estimator)?));
    }

    figure.compose(features)
}

fn fit_groups<E: Estimator>(data: &Dataset, groups: Vec<Subgroup>, estimator: &E) -> Result<Vec<FittedCurve>, AppError> {
    groups
        .into_iter()
        .map(|g| {
            let (durations, events) = data.select(&g.rows);
            estimator.fit(&durations, &events, g.label)
        })
        .collect()
}
