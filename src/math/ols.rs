//! Least-squares solvers.
//!
//! Every fitting strategy in this project reduces to one linear problem:
//!
//! ```text
//! minimize ||X a - y||^2            (plain least squares)
//! minimize ||X a - y||^2 + λ ||D a||^2   (penalized least squares)
//! ```
//!
//! Implementation choices:
//! - SVD is used to solve the least-squares problem robustly even when the
//!   design matrix is tall (more rows than columns) or rank-deficient.
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic
//!   for non-square matrices.)
//! - The penalized problem is solved by stacking `sqrt(λ) D` below `X` with a
//!   zero right-hand side, so both forms funnel through the same SVD path.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if the strict solve fails. Spline
    // design matrices can have near-empty columns when a segment contains few
    // samples, so a single fixed tolerance either rejects solvable systems or
    // accepts garbage.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(a) = svd.solve(y, tol) {
            if a.iter().all(|v| v.is_finite()) {
                return Some(a);
            }
        }
    }

    None
}

/// Solve `minimize ||X a - y||^2 + lambda ||D a||^2`.
///
/// `d` must have the same column count as `x`. Returns `None` for a
/// non-positive or non-finite `lambda`, a shape mismatch, or an
/// ill-conditioned stacked system.
pub fn solve_penalized(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
    d: &DMatrix<f64>,
    lambda: f64,
) -> Option<DVector<f64>> {
    if !(lambda.is_finite() && lambda > 0.0) {
        return None;
    }
    if d.ncols() != x.ncols() {
        return None;
    }

    let n = x.nrows();
    let m = d.nrows();
    let p = x.ncols();
    let sqrt_lambda = lambda.sqrt();

    // Stacked system: [X; sqrt(lambda) D] a = [y; 0].
    let mut stacked = DMatrix::<f64>::zeros(n + m, p);
    let mut rhs = DVector::<f64>::zeros(n + m);
    for i in 0..n {
        for j in 0..p {
            stacked[(i, j)] = x[(i, j)];
        }
        rhs[i] = y[i];
    }
    for i in 0..m {
        for j in 0..p {
            stacked[(n + i, j)] = sqrt_lambda * d[(i, j)];
        }
    }

    solve_least_squares(&stacked, &rhs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let a = solve_least_squares(&x, &y).unwrap();
        assert!((a[0] - 2.0).abs() < 1e-10);
        assert!((a[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn penalized_solve_matches_plain_for_tiny_lambda() {
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);
        // First-difference penalty on the two coefficients.
        let d = DMatrix::from_row_slice(1, 2, &[-1.0, 1.0]);

        let a = solve_penalized(&x, &y, &d, 1e-14).unwrap();
        assert!((a[0] - 2.0).abs() < 1e-6);
        assert!((a[1] - 3.0).abs() < 1e-6);
    }

    #[test]
    fn penalized_solve_rejects_bad_lambda() {
        let x = DMatrix::identity(2, 2);
        let y = DVector::from_row_slice(&[1.0, 2.0]);
        let d = DMatrix::from_row_slice(1, 2, &[-1.0, 1.0]);

        assert!(solve_penalized(&x, &y, &d, 0.0).is_none());
        assert!(solve_penalized(&x, &y, &d, f64::NAN).is_none());
    }

    #[test]
    fn large_penalty_pulls_coefficients_together() {
        // With a huge first-difference penalty the two coefficients should
        // collapse toward a common value.
        let x = DMatrix::identity(2, 2);
        let y = DVector::from_row_slice(&[0.0, 10.0]);
        let d = DMatrix::from_row_slice(1, 2, &[-1.0, 1.0]);

        let a = solve_penalized(&x, &y, &d, 1e6).unwrap();
        assert!((a[0] - a[1]).abs() < 0.01, "got {} vs {}", a[0], a[1]);
    }
}
