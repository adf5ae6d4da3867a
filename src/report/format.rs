//! Formatted terminal output.
//!
//! All formatting lives here so output changes stay localized.

use chrono::{DateTime, Local};

use crate::figure::Figure;
use crate::io::LoadedData;

use super::{CurveSummary, summarize};

/// Format the per-curve summary of every figure, under a timestamped header.
pub fn format_summary(figures: &[Figure], generated: DateTime<Local>) -> String {
    let mut out = String::new();

    out.push_str("=== km - Kaplan-Meier survival by covariate ===\n");
    out.push_str(&format!("Generated: {}\n", generated.format("%Y-%m-%d %H:%M:%S")));

    for figure in figures {
        out.push('\n');
        out.push_str(&format!("{}\n", figure.title));
        out.push_str(&format_table(&summarize(figure)));
    }

    out
}

/// One-line description of what was loaded and skipped.
pub fn format_load_summary(loaded: &LoadedData) -> String {
    let mut out = format!(
        "Rows: read={} used={} skipped={}\n",
        loaded.rows_read,
        loaded.rows_used,
        loaded.row_errors.len()
    );
    for err in loaded.row_errors.iter().take(5) {
        out.push_str(&format!("  line {}: {}\n", err.line, err.message));
    }
    if loaded.row_errors.len() > 5 {
        out.push_str(&format!("  ... {} more\n", loaded.row_errors.len() - 5));
    }
    out
}

fn format_table(rows: &[CurveSummary]) -> String {
    let feature_w = rows.iter().map(|r| r.feature.len()).max().unwrap_or(0).max("feature".len());
    let group_w = rows.iter().map(|r| r.group.len()).max().unwrap_or(0).max("group".len());

    let mut out = String::new();
    out.push_str(&format!(
        "{:<feature_w$}  {:<group_w$}  {:>6}  {:>6}  {:>8}\n",
        "feature", "group", "n", "events", "median"
    ));
    for r in rows {
        out.push_str(&format!(
            "{:<feature_w$}  {:<group_w$}  {:>6}  {:>6}  {:>8}\n",
            r.feature,
            r.group,
            r.n,
            r.events,
            fmt_median(r.median)
        ));
    }
    out
}

fn fmt_median(m: Option<f64>) -> String {
    match m {
        Some(v) => format!("{v:.1}"),
        None => "-".to_string(),
    }
}
