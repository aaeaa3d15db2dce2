//! Two-column text ingest.
//!
//! The input format is deliberately minimal: one `x y` pair per line,
//! whitespace-separated. Blank lines and `#` comments are skipped.
//!
//! Design goals:
//! - **Row-level validation**: malformed rows are collected and reported,
//!   not fatal (clear errors + exit code 2 only when nothing is usable)
//! - **No cleaning here**: NaN/Inf values that *parse* are passed through;
//!   dropping them is the sanitizer's documented job
//! - **Separation of concerns**: no fitting logic here

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: raw pairs + row errors + counts.
#[derive(Debug, Clone)]
pub struct RawSeries {
    pub pairs: Vec<(f64, f64)>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Read raw `(x, y)` pairs from a whitespace-delimited two-column file.
pub fn read_xy_file(path: &Path) -> Result<RawSeries, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::config(format!("Failed to open input '{}': {e}", path.display()))
    })?;
    let reader = BufReader::new(file);

    let mut pairs = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| {
            AppError::config(format!(
                "Failed to read '{}' at line {line_no}: {e}",
                path.display()
            ))
        })?;

        match parse_line(&line) {
            Ok(None) => {}
            Ok(Some(pair)) => {
                rows_read += 1;
                pairs.push(pair);
            }
            Err(message) => {
                rows_read += 1;
                row_errors.push(RowError {
                    line: line_no,
                    message,
                });
            }
        }
    }

    if pairs.is_empty() {
        return Err(AppError::config(format!(
            "No usable data rows in '{}' ({} malformed).",
            path.display(),
            row_errors.len()
        )));
    }

    Ok(RawSeries {
        pairs,
        row_errors,
        rows_read,
    })
}

/// Parse one line. `Ok(None)` for blank/comment lines.
fn parse_line(line: &str) -> Result<Option<(f64, f64)>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    if tokens.len() != 2 {
        return Err(format!("Expected 2 columns, found {}.", tokens.len()));
    }

    let x: f64 = tokens[0]
        .parse()
        .map_err(|_| format!("Unparseable x value '{}'.", tokens[0]))?;
    let y: f64 = tokens[1]
        .parse()
        .map_err(|_| format!("Unparseable y value '{}'.", tokens[1]))?;

    Ok(Some((x, y)))
}
