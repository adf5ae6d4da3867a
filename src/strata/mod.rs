//! Stratification: splitting a dataset into disjoint subgroups.
//!
//! Subgroups are row-index views over a borrowed `Dataset`; nothing here adds
//! columns to (or otherwise mutates) the caller's data.

pub mod bins;

use std::collections::BTreeMap;

use crate::data::{ColumnValues, Dataset};
use crate::domain::BinSpec;
use crate::error::AppError;

pub use bins::Bins;

/// Rows sharing one value (or one bin) of a stratifying column.
#[derive(Debug, Clone, PartialEq)]
pub struct Subgroup {
    /// Curve label, `"sex: 1"` or `"30.0 - 60.0)"`.
    pub label: String,
    /// Row indices into the dataset, ascending.
    pub rows: Vec<usize>,
}

/// Partition rows by each distinct value of `column`, in ascending value order.
///
/// Curves are labelled `"<column>: <value>"`.
pub fn by_category(data: &Dataset, column: &str) -> Result<Vec<Subgroup>, AppError> {
    let col = data.column(column)?;

    let groups: Vec<(String, Vec<usize>)> = match &col.values {
        ColumnValues::Integer(values) => group_ordered(values.iter().copied(), |v| v.to_string()),
        ColumnValues::Text(values) => group_ordered(values.iter().cloned(), |v| v),
        ColumnValues::Float(values) => {
            let mut order: Vec<usize> = (0..values.len()).collect();
            order.sort_by(|&a, &b| values[a].total_cmp(&values[b]).then(a.cmp(&b)));

            let mut groups: Vec<(f64, Vec<usize>)> = Vec::new();
            for i in order {
                match groups.last_mut() {
                    Some((v, rows)) if *v == values[i] => rows.push(i),
                    _ => groups.push((values[i], vec![i])),
                }
            }
            groups.into_iter().map(|(v, rows)| (format!("{v:?}"), rows)).collect()
        }
    };

    let subgroups: Vec<Subgroup> = groups
        .into_iter()
        .map(|(key, rows)| Subgroup {
            label: format!("{column}: {key}"),
            rows,
        })
        .collect();

    for g in &subgroups {
        log::debug!("{}: {} rows", g.label, g.rows.len());
    }
    Ok(subgroups)
}

/// Partition rows of a numeric `column` by the bins of `spec`.
///
/// Only bins holding at least one row become subgroups, in ascending bin
/// order. Values outside explicit cut points are left out of every subgroup.
pub fn by_bins(data: &Dataset, column: &str, spec: &BinSpec) -> Result<Vec<Subgroup>, AppError> {
    let values = data.column(column)?.to_f64()?;
    let bins = Bins::resolve(spec, &values)?;

    let mut members: Vec<Vec<usize>> = vec![Vec::new(); bins.len()];
    let mut outside = 0usize;
    for (row, &v) in values.iter().enumerate() {
        match bins.locate(v) {
            Some(b) => members[b].push(row),
            None => outside += 1,
        }
    }

    if outside > 0 {
        log::warn!(
            "{column}: {outside} of {} rows fall outside cut points {:?} and are left out",
            values.len(),
            bins.edges()
        );
    }

    let mut subgroups = Vec::with_capacity(bins.len());
    for (i, rows) in members.into_iter().enumerate() {
        let label = bins.label(i);
        if rows.is_empty() {
            log::warn!("{column}: bin {label} is empty, no curve drawn");
            continue;
        }
        log::debug!("{column} {label}: {} rows", rows.len());
        subgroups.push(Subgroup { label, rows });
    }
    Ok(subgroups)
}

fn group_ordered<K: Ord>(values: impl Iterator<Item = K>, show: impl Fn(K) -> String) -> Vec<(String, Vec<usize>)> {
    let mut map: BTreeMap<K, Vec<usize>> = BTreeMap::new();
    for (row, v) in values.enumerate() {
        map.entry(v).or_default().push(row);
    }
    map.into_iter().map(|(k, rows)| (show(k), rows)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;
    use crate::domain::{EVENT_COLUMN, TIME_COLUMN};

    fn dataset() -> Dataset {
        Dataset::from_columns(vec![
            Column::integer("sex", vec![0, 1, 0, 0, 1, 0, 1, 0, 0, 1]),
            Column::float("age", vec![45.0, 62.0, 75.0, 59.9, 81.0, 90.0, 60.0, 50.0, 65.0, 99.0]),
            Column::float("ratio", vec![0.5, 1.0, 0.5, 1.0, 0.5, 0.5, 1.0, 0.5, 0.5, 1.0]),
            Column::text("smoker", ["no", "yes", "no", "no", "no", "yes", "no", "no", "no", "no"]
                .iter()
                .map(|s| s.to_string())
                .collect()),
            Column::float(TIME_COLUMN, (1..=10).map(|t| t as f64 * 10.0).collect()),
            Column::integer(EVENT_COLUMN, vec![1, 0, 1, 0, 1, 1, 0, 0, 1, 0]),
        ])
        .unwrap()
    }

    fn assert_partition(groups: &[Subgroup], n_rows: usize) {
        let mut all: Vec<usize> = groups.iter().flat_map(|g| g.rows.iter().copied()).collect();
        all.sort_unstable();
        assert_eq!(all, (0..n_rows).collect::<Vec<_>>());
    }

    #[test]
    fn categorical_sex_split() {
        let data = dataset();
        let groups = by_category(&data, "sex").unwrap();

        let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["sex: 0", "sex: 1"]);
        assert_eq!(groups[0].rows.len(), 6);
        assert_eq!(groups[1].rows.len(), 4);
        assert_partition(&groups, data.n_rows());
    }

    #[test]
    fn float_and_text_categories() {
        let data = dataset();

        let ratio = by_category(&data, "ratio").unwrap();
        let labels: Vec<&str> = ratio.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["ratio: 0.5", "ratio: 1.0"]);
        assert_partition(&ratio, data.n_rows());

        let smoker = by_category(&data, "smoker").unwrap();
        assert_eq!(smoker[0].label, "smoker: no");
        assert_eq!(smoker[1].rows, vec![1, 5]);
    }

    #[test]
    fn unknown_column_is_a_lookup_error() {
        let err = by_category(&dataset(), "weight").unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn age_cut_points() {
        let data = dataset();
        let spec = BinSpec::Edges(vec![30.0, 60.0, 80.0, 100.0]);
        let groups = by_bins(&data, "age", &spec).unwrap();

        let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["30.0 - 60.0)", "60.0 - 80.0)", "80.0 - 100.0)"]);
        // 60.0 closes the first bin.
        assert_eq!(groups[0].rows, vec![0, 3, 6, 7]);
        assert_eq!(groups[1].rows, vec![1, 2, 8]);
        assert_eq!(groups[2].rows, vec![4, 5, 9]);
        assert_partition(&groups, data.n_rows());
    }

    #[test]
    fn bin_count_partitions_every_row() {
        let data = dataset();
        let groups = by_bins(&data, "age", &BinSpec::Count(3)).unwrap();
        assert_eq!(groups.len(), 3);
        assert_partition(&groups, data.n_rows());
        assert!(groups[0].label.starts_with("44.946 - "));
    }

    #[test]
    fn out_of_range_and_empty_bins_are_dropped() {
        let data = dataset();
        let spec = BinSpec::Edges(vec![0.0, 10.0, 60.0, 80.0]);
        let groups = by_bins(&data, "age", &spec).unwrap();

        let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["10.0 - 60.0)", "60.0 - 80.0)"]);
        let covered: usize = groups.iter().map(|g| g.rows.len()).sum();
        assert_eq!(covered, 7);
    }

    #[test]
    fn binning_text_fails() {
        assert!(by_bins(&dataset(), "smoker", &BinSpec::Count(2)).is_err());
    }
}
