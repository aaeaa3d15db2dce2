//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{BreakpointSet, DatasetStats, FitResult, KpiSet, QualityReport, ResidualRow};

/// Format the full run summary (dataset stats + fit method + KPI table).
pub fn format_run_summary(
    stats: &DatasetStats,
    breakpoints: &BreakpointSet,
    fit: &FitResult,
    kpis: &KpiSet,
    quality: &QualityReport,
) -> String {
    let mut out = String::new();

    out.push_str("=== osc - Oscillatory Curve Fit ===\n");
    out.push_str(&format!(
        "Samples: n={} | x=[{:.4}, {:.4}] | y=[{:.4}, {:.4}]\n",
        stats.n_points, stats.x_min, stats.x_max, stats.y_min, stats.y_max
    ));
    out.push_str(&format!(
        "Breakpoints: {} ({} segments)\n",
        breakpoints.count(),
        breakpoints.segment_count()
    ));
    out.push_str(&format!("Method: {}\n", fit.method.display_name()));

    out.push_str("\nFit quality:\n");
    out.push_str(&format!(
        "- SE={:.6} | 2-norm={:.6} | RMSE={:.6}\n",
        kpis.se, kpis.norm2, kpis.rmse
    ));
    out.push_str(&format!(
        "- R^2         : {:<12} {}\n",
        fmt_opt(kpis.r_squared, 4),
        verdict(&quality.r_squared)
    ));
    out.push_str(&format!(
        "- rel RMSE    : {:<12} {}\n",
        fmt_opt_pct(kpis.rel_rmse_pct),
        verdict(&quality.rel_rmse)
    ));
    out.push_str(&format!(
        "- bias ratio  : {:<12} {}\n",
        fmt_opt(kpis.bias_ratio, 4),
        verdict(&quality.bias)
    ));
    out.push_str(&format!(
        "- within 2s   : {:<12} {}\n",
        fmt_opt_pct(kpis.within_2sigma_pct),
        verdict(&quality.coverage)
    ));

    out.push_str("\nResiduals:\n");
    out.push_str(&format!(
        "- mean={:.6} std={:.6} min={:.6} max={:.6} median|r|={:.6}\n",
        kpis.residual_mean,
        kpis.residual_std,
        kpis.residual_min,
        kpis.residual_max,
        kpis.residual_median_abs
    ));

    out
}

/// Indices of the top-N rows by absolute residual, worst first.
///
/// Ties break by row index, so the ranking is deterministic.
pub fn rank_worst(rows: &[ResidualRow], top_n: usize) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..rows.len()).collect();
    idx.sort_by(|&a, &b| {
        rows[b]
            .residual
            .abs()
            .partial_cmp(&rows[a].residual.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    idx.truncate(top_n);
    idx
}

/// Format the worst-fitting samples as a fixed-width table.
pub fn format_worst_points(rows: &[ResidualRow], worst: &[usize]) -> String {
    let mut out = String::new();
    out.push_str("Worst-fitting samples (by |residual|):\n");
    out.push_str(&format!(
        "{:>12} {:>12} {:>12} {:>12}\n",
        "x", "y_obs", "y_fit", "residual"
    ));
    out.push_str(&format!(
        "{:-<12} {:-<12} {:-<12} {:-<12}\n",
        "", "", "", ""
    ));
    for &i in worst {
        let r = &rows[i];
        out.push_str(&format!(
            "{:>12.4} {:>12.4} {:>12.4} {:>12.4}\n",
            r.x, r.y_obs, r.y_fit, r.residual
        ));
    }
    out
}

fn fmt_opt(v: Option<f64>, decimals: usize) -> String {
    match v {
        Some(v) => format!("{v:.decimals$}"),
        None => "undefined".to_string(),
    }
}

fn fmt_opt_pct(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:.2}%"),
        None => "undefined".to_string(),
    }
}

fn verdict(label: &Option<String>) -> String {
    match label {
        Some(label) => format!("[{label}]"),
        None => "[n/a]".to_string(),
    }
}
