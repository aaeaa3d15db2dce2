//! Difference penalty matrices for penalized fits.
//!
//! A second-difference penalty on coefficients (or directly on fitted values)
//! is what turns an interpolation-shaped problem into a smoothing one:
//! minimizing `||X a - y||^2 + λ ||D a||^2` with `D` the second-difference
//! operator shrinks the fit toward a straight line as `λ` grows.

use nalgebra::DMatrix;

/// Build the second-difference operator `D` for `m` coefficients.
///
/// Each row is `[.. 1, -2, 1 ..]`; the matrix has `m - 2` rows. For `m < 3`
/// there are no second differences to penalize and the matrix has zero rows
/// (a valid, empty penalty).
pub fn second_difference_matrix(m: usize) -> DMatrix<f64> {
    let rows = m.saturating_sub(2);
    let mut d = DMatrix::<f64>::zeros(rows, m);
    for i in 0..rows {
        d[(i, i)] = 1.0;
        d[(i, i + 1)] = -2.0;
        d[(i, i + 2)] = 1.0;
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_difference_shape_and_stencil() {
        let d = second_difference_matrix(5);
        assert_eq!(d.nrows(), 3);
        assert_eq!(d.ncols(), 5);
        assert_eq!(d[(1, 1)], 1.0);
        assert_eq!(d[(1, 2)], -2.0);
        assert_eq!(d[(1, 3)], 1.0);
        assert_eq!(d[(1, 0)], 0.0);
    }

    #[test]
    fn second_difference_annihilates_linear_sequences() {
        let d = second_difference_matrix(6);
        let linear = nalgebra::DVector::from_fn(6, |i, _| 2.0 + 3.0 * i as f64);
        let out = &d * &linear;
        assert!(out.iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn second_difference_degenerate_sizes() {
        assert_eq!(second_difference_matrix(2).nrows(), 0);
        assert_eq!(second_difference_matrix(0).nrows(), 0);
    }
}
