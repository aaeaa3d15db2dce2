//! Result exports: per-sample CSV and a JSON fit report.
//!
//! Exports are meant to be easy to consume in spreadsheets or downstream
//! scripts; the core pipeline never calls these itself.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{ReportFile, ResidualRow};
use crate::error::AppError;

/// Write the row-aligned `(x, y, y_fit, residual)` stream to a CSV file.
pub fn write_results_csv(path: &Path, rows: &[ResidualRow]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::config(format!(
            "Failed to create export CSV '{}': {e}",
            path.display()
        ))
    })?;

    writeln!(file, "x,y,y_fit,residual")
        .map_err(|e| AppError::config(format!("Failed to write export CSV header: {e}")))?;

    for r in rows {
        writeln!(
            file,
            "{:.10},{:.10},{:.10},{:.10}",
            r.x, r.y_obs, r.y_fit, r.residual
        )
        .map_err(|e| AppError::config(format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

/// Write the fit report (method, stats, KPIs, verdicts) as JSON.
pub fn write_report_json(path: &Path, report: &ReportFile) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| AppError::config(format!("Failed to serialize fit report: {e}")))?;

    std::fs::write(path, json).map_err(|e| {
        AppError::config(format!(
            "Failed to write fit report '{}': {e}",
            path.display()
        ))
    })?;

    Ok(())
}
