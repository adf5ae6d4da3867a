//! Reporting utilities: per-curve summaries and formatted terminal output.

pub mod format;

pub use format::{format_load_summary, format_summary};

use crate::figure::Figure;

/// One row of the summary table.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveSummary {
    pub feature: String,
    pub group: String,
    pub n: usize,
    pub events: usize,
    /// First time at which survival drops to 0.5 or below.
    pub median: Option<f64>,
}

/// Summarize every curve of every visible panel, in grid order.
pub fn summarize(figure: &Figure) -> Vec<CurveSummary> {
    figure
        .visible_panels()
        .flat_map(|panel| {
            let feature = panel.title.clone().unwrap_or_default();
            panel.curves.iter().map(move |c| CurveSummary {
                feature: feature.clone(),
                group: c.label.clone(),
                n: c.n_subjects(),
                events: c.n_events(),
                median: c.median_survival(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::{Estimator, KaplanMeier};

    #[test]
    fn one_row_per_curve_in_grid_order() {
        let km = KaplanMeier::new();
        let mut fig = Figure::categorical();
        fig.compose(vec![
            (
                "sex".into(),
                vec![
                    km.fit(&[1.0, 2.0, 3.0, 4.0], &[true, true, true, false], "sex: 0".into()).unwrap(),
                    km.fit(&[5.0, 6.0], &[false, false], "sex: 1".into()).unwrap(),
                ],
            ),
            ("smoking".into(), vec![km.fit(&[2.0], &[true], "smoking: 1".into()).unwrap()]),
        ])
        .unwrap();

        let rows = summarize(&fig);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].feature, "sex");
        assert_eq!(rows[0].n, 4);
        assert_eq!(rows[0].events, 3);
        assert_eq!(rows[0].median, Some(2.0));
        assert_eq!(rows[1].median, None);
        assert_eq!(rows[2].feature, "smoking");
    }
}
