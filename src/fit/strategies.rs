//! The three fitting strategies, in escalation order.
//!
//! Every strategy is a pure function from `(Dataset, settings)` to fitted
//! values at the dataset's x positions. A strategy that cannot produce a
//! solution returns a tagged `FitFailure` instead of panicking or guessing;
//! deciding what to do about a failure is the engine's job.

use nalgebra::{DMatrix, DVector};

use crate::domain::{BreakpointSet, Dataset};
use crate::math::{
    CUBIC_DEGREE, clamped_knots, design_matrix, second_difference_matrix, solve_least_squares,
    solve_penalized,
};

/// A recoverable failure of a single fitting strategy.
///
/// Never surfaced past the fit engine; it only exists to drive escalation.
#[derive(Debug, Clone)]
pub struct FitFailure {
    pub reason: String,
}

impl FitFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Primary: least-squares cubic spline constrained to the breakpoints.
///
/// Fails when the system is underdetermined (fewer samples than basis
/// functions) or the solve is too ill-conditioned.
pub fn lsq_spline(dataset: &Dataset, breakpoints: &BreakpointSet) -> Result<Vec<f64>, FitFailure> {
    let xs = dataset.xs();
    let ys = dataset.ys();

    let knots = clamped_knots(&breakpoints.values, CUBIC_DEGREE);
    let num_basis = crate::math::basis_count(&knots, CUBIC_DEGREE);
    if xs.len() < num_basis {
        return Err(FitFailure::new(format!(
            "Underdetermined spline system: n={} samples < {} basis functions.",
            xs.len(),
            num_basis
        )));
    }

    let b = design_matrix(&xs, CUBIC_DEGREE, &knots);
    let y = DVector::from_vec(ys);
    let coeffs = solve_least_squares(&b, &y)
        .ok_or_else(|| FitFailure::new("Ill-conditioned breakpoint spline system."))?;

    Ok((&b * &coeffs).iter().copied().collect())
}

/// Fallback A: penalized cubic spline with knots at the data sites.
///
/// With the default penalty (1e-10) this is as close to an interpolant as
/// the solver allows; the tiny second-difference penalty is what keeps the
/// system solvable when the plain breakpoint fit cannot be constructed.
pub fn near_interp_spline(dataset: &Dataset, penalty: f64) -> Result<Vec<f64>, FitFailure> {
    let xs = dataset.xs();
    let ys = dataset.ys();
    if xs.len() < 2 {
        return Err(FitFailure::new(
            "Need at least 2 samples for a site-knot spline.",
        ));
    }

    // The data sites are strictly increasing (dataset invariant), so they
    // are directly usable as a breakpoint sequence.
    let knots = clamped_knots(&xs, CUBIC_DEGREE);
    let num_basis = crate::math::basis_count(&knots, CUBIC_DEGREE);

    let b = design_matrix(&xs, CUBIC_DEGREE, &knots);
    let y = DVector::from_vec(ys);
    let d = second_difference_matrix(num_basis);

    let coeffs = solve_penalized(&b, &y, &d, penalty).ok_or_else(|| {
        FitFailure::new(format!(
            "Penalized site-knot spline failed (penalty={penalty})."
        ))
    })?;

    Ok((&b * &coeffs).iter().copied().collect())
}

/// Fallback B: generic discrete second-difference smoother.
///
/// Solves `min ||z - y||^2 + lambda ||D2 z||^2` directly for the fitted
/// values, with no spline basis involved. This is the last resort: it is
/// solvable for any sample count (for n < 3 the penalty is empty and the
/// smoother returns the data unchanged).
pub fn fixed_smoother(dataset: &Dataset, penalty: f64) -> Result<Vec<f64>, FitFailure> {
    let ys = dataset.ys();
    let n = ys.len();
    if n == 0 {
        return Err(FitFailure::new("Cannot smooth an empty dataset."));
    }

    let identity = DMatrix::<f64>::identity(n, n);
    let y = DVector::from_vec(ys);
    let d = second_difference_matrix(n);

    let z = solve_penalized(&identity, &y, &d, penalty).ok_or_else(|| {
        FitFailure::new(format!("Discrete smoother failed (penalty={penalty})."))
    })?;

    Ok(z.iter().copied().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sanitize;
    use crate::fit::breakpoints::uniform_breakpoints;

    /// Cubic polynomial data: exactly representable by a cubic spline, so the
    /// primary fit should reproduce it to solver precision.
    fn cubic_poly_dataset(n: usize) -> Dataset {
        let pairs: Vec<(f64, f64)> = (0..n)
            .map(|i| {
                let x = i as f64 / (n as f64 - 1.0) * 4.0;
                (x, 0.5 * x * x * x - x * x + 2.0 * x - 3.0)
            })
            .collect();
        sanitize(&pairs)
    }

    #[test]
    fn lsq_spline_reproduces_cubic_polynomial() {
        let ds = cubic_poly_dataset(40);
        let bp = uniform_breakpoints(&ds, 6).unwrap();
        let fitted = lsq_spline(&ds, &bp).unwrap();

        for (s, f) in ds.samples.iter().zip(&fitted) {
            assert!((s.y - f).abs() < 1e-8, "at x={}: {} vs {}", s.x, s.y, f);
        }
    }

    #[test]
    fn lsq_spline_fails_when_underdetermined() {
        // 10 samples against 30 breakpoints (32 basis functions).
        let ds = cubic_poly_dataset(10);
        let bp = uniform_breakpoints(&ds, 30).unwrap();
        let err = lsq_spline(&ds, &bp).unwrap_err();
        assert!(err.reason.contains("Underdetermined"), "{}", err.reason);
    }

    #[test]
    fn near_interp_spline_hugs_the_data() {
        let ds = cubic_poly_dataset(20);
        let fitted = near_interp_spline(&ds, 1e-10).unwrap();
        for (s, f) in ds.samples.iter().zip(&fitted) {
            assert!((s.y - f).abs() < 1e-3, "at x={}: {} vs {}", s.x, s.y, f);
        }
    }

    #[test]
    fn near_interp_spline_rejects_bad_penalty() {
        let ds = cubic_poly_dataset(20);
        assert!(near_interp_spline(&ds, f64::NAN).is_err());
        assert!(near_interp_spline(&ds, 0.0).is_err());
    }

    #[test]
    fn fixed_smoother_returns_data_for_tiny_n() {
        let ds = sanitize(&[(0.0, 1.0), (1.0, 5.0)]);
        let fitted = fixed_smoother(&ds, 0.001).unwrap();
        assert!((fitted[0] - 1.0).abs() < 1e-9);
        assert!((fitted[1] - 5.0).abs() < 1e-9);
    }

    #[test]
    fn fixed_smoother_flattens_a_spike() {
        let pairs: Vec<(f64, f64)> = (0..21)
            .map(|i| (i as f64, if i == 10 { 100.0 } else { 0.0 }))
            .collect();
        let ds = sanitize(&pairs);
        let fitted = fixed_smoother(&ds, 10.0).unwrap();
        // Heavy smoothing should pull the spike well below its raw height.
        assert!(fitted[10] < 50.0, "spike remained at {}", fitted[10]);
        assert!(fitted.iter().all(|v| v.is_finite()));
    }
}
