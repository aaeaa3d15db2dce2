//! Breakpoint generation.
//!
//! The primary spline fit is constrained to a uniform partition of the
//! x-domain. Degenerate inputs (empty dataset, single sample, zero-width
//! x-range) are rejected here with an explicit error instead of silently
//! producing coincident breakpoints.

use crate::domain::{BreakpointSet, Dataset};
use crate::error::AppError;

/// Generate `count` evenly spaced breakpoints over `[min(x), max(x)]`.
///
/// Endpoints are exact; interior values are linearly interpolated.
pub fn uniform_breakpoints(dataset: &Dataset, count: usize) -> Result<BreakpointSet, AppError> {
    if count < 2 {
        return Err(AppError::config(format!(
            "Breakpoint count must be >= 2 (got {count})."
        )));
    }

    let Some((x_min, x_max)) = dataset.x_range() else {
        return Err(AppError::degenerate(
            "Cannot place breakpoints on an empty dataset.",
        ));
    };
    if dataset.len() < 2 {
        return Err(AppError::degenerate(
            "Need at least 2 distinct x values to place breakpoints.",
        ));
    }
    if !(x_max > x_min) {
        return Err(AppError::degenerate(format!(
            "Zero-width x-range [{x_min}, {x_max}] is unfittable."
        )));
    }

    let step = (x_max - x_min) / (count as f64 - 1.0);
    let mut values = Vec::with_capacity(count);
    values.push(x_min);
    for i in 1..count - 1 {
        values.push(x_min + step * i as f64);
    }
    values.push(x_max);

    Ok(BreakpointSet { values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sample;

    fn dataset(xs: &[f64]) -> Dataset {
        Dataset {
            samples: xs.iter().map(|&x| Sample { x, y: 0.0 }).collect(),
        }
    }

    #[test]
    fn breakpoints_span_the_range_exactly() {
        let ds = dataset(&[1.0, 2.0, 4.0, 9.0]);
        let bp = uniform_breakpoints(&ds, 30).unwrap();

        assert_eq!(bp.count(), 30);
        assert_eq!(bp.segment_count(), 29);
        assert_eq!(bp.first(), 1.0);
        assert_eq!(bp.last(), 9.0);
        for w in bp.values.windows(2) {
            assert!(w[0] < w[1]);
        }
    }

    #[test]
    fn two_breakpoints_are_just_the_endpoints() {
        let ds = dataset(&[0.0, 5.0]);
        let bp = uniform_breakpoints(&ds, 2).unwrap();
        assert_eq!(bp.values, vec![0.0, 5.0]);
    }

    #[test]
    fn rejects_count_below_two() {
        let ds = dataset(&[0.0, 1.0]);
        assert_eq!(uniform_breakpoints(&ds, 1).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn rejects_empty_and_single_sample_datasets() {
        assert_eq!(
            uniform_breakpoints(&dataset(&[]), 10).unwrap_err().exit_code(),
            3
        );
        assert_eq!(
            uniform_breakpoints(&dataset(&[1.0]), 10).unwrap_err().exit_code(),
            3
        );
    }
}
