//! B-spline basis evaluation.
//!
//! The primary fitting strategy is a least-squares cubic spline constrained
//! to a set of breakpoints. We represent it in the B-spline basis:
//!
//! - the knot vector is the breakpoint sequence with `degree + 1` repeated
//!   boundary knots at each end (a "clamped" basis)
//! - basis values at a point are computed with the Cox-de Boor recursion
//!   in its triangular form, which only touches the `degree + 1` functions
//!   that are non-zero at that point
//!
//! For a cubic (order 4) basis over `k` breakpoints there are `k + 2` basis
//! functions, and the fitted curve is C2-continuous across breakpoints.

use nalgebra::DMatrix;

/// Degree of the cubic (order-4) basis used by the spline strategies.
pub const CUBIC_DEGREE: usize = 3;

/// Build a clamped knot vector from strictly increasing breakpoints.
///
/// # Panics
/// Panics if fewer than 2 breakpoints are given. Callers validate counts
/// before constructing a basis.
pub fn clamped_knots(breakpoints: &[f64], degree: usize) -> Vec<f64> {
    assert!(breakpoints.len() >= 2, "need at least 2 breakpoints");

    let first = breakpoints[0];
    let last = breakpoints[breakpoints.len() - 1];

    let mut knots = Vec::with_capacity(breakpoints.len() + 2 * degree);
    knots.extend(std::iter::repeat(first).take(degree + 1));
    knots.extend_from_slice(&breakpoints[1..breakpoints.len() - 1]);
    knots.extend(std::iter::repeat(last).take(degree + 1));
    knots
}

/// Number of basis functions for a knot vector and degree.
pub fn basis_count(knots: &[f64], degree: usize) -> usize {
    knots.len() - degree - 1
}

/// Evaluate all basis functions at `x`, returning a dense row.
///
/// `x` is clamped into the spline's support, so evaluation at (or slightly
/// past) the boundary knots is well-defined.
pub fn basis_row(x: f64, degree: usize, knots: &[f64]) -> Vec<f64> {
    let num_basis = basis_count(knots, degree);
    let mut row = vec![0.0; num_basis];

    let x = x.clamp(knots[degree], knots[num_basis]);

    // Knot span `mu` with knots[mu] <= x < knots[mu+1], capped at the last
    // valid span so x == max(knots) lands in the final segment.
    let mut span = degree;
    while span < num_basis - 1 && x >= knots[span + 1] {
        span += 1;
    }

    // Triangular Cox-de Boor recursion (The NURBS Book, A2.2). `vals[j]`
    // holds the value of basis function `span - d + j` at recursion depth d.
    let mut vals = vec![0.0; degree + 1];
    let mut left = vec![0.0; degree + 1];
    let mut right = vec![0.0; degree + 1];
    vals[0] = 1.0;

    for d in 1..=degree {
        left[d] = x - knots[span + 1 - d];
        right[d] = knots[span + d] - x;
        let mut saved = 0.0;
        for j in 0..d {
            let denom = right[j + 1] + left[d - j];
            // Repeated knots make some denominators zero; those terms carry
            // zero weight by convention.
            let temp = if denom != 0.0 { vals[j] / denom } else { 0.0 };
            vals[j] = saved + right[j + 1] * temp;
            saved = left[d - j] * temp;
        }
        vals[d] = saved;
    }

    for (j, &v) in vals.iter().enumerate() {
        row[span - degree + j] = v;
    }
    row
}

/// Build the design matrix `B` with `B[i][j] = N_j(x_i)`.
pub fn design_matrix(xs: &[f64], degree: usize, knots: &[f64]) -> DMatrix<f64> {
    let num_basis = basis_count(knots, degree);
    let mut b = DMatrix::<f64>::zeros(xs.len(), num_basis);
    for (i, &x) in xs.iter().enumerate() {
        let row = basis_row(x, degree, knots);
        for (j, &v) in row.iter().enumerate() {
            b[(i, j)] = v;
        }
    }
    b
}
