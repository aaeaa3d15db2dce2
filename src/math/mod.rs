//! Mathematical utilities: B-spline basis, penalty matrices, and least squares.

pub mod bspline;
pub mod ols;
pub mod penalty;

pub use bspline::*;
pub use ols::*;
pub use penalty::*;
