//! Linear algebra utilities
//!
//! Small matrix helpers required by the filter. The covariance matrices here
//! are tiny (at most 7x7), so clarity wins over cleverness.

use nalgebra::DMatrix;

/// Check if a matrix is positive definite
///
/// Uses Cholesky decomposition, which succeeds exactly for symmetric
/// positive-definite matrices.
pub fn is_positive_definite(matrix: &DMatrix<f64>) -> bool {
    matrix.clone().cholesky().is_some()
}

/// Make a matrix symmetric by averaging with its transpose
///
/// Covariance updates of the form `P - K S K^T` accumulate floating-point
/// asymmetry over many cycles; re-symmetrizing after each update keeps the
/// symmetric-PSD invariant intact.
pub fn symmetrize(matrix: &DMatrix<f64>) -> DMatrix<f64> {
    (matrix + matrix.transpose()) * 0.5
}

/// Largest absolute difference between a matrix and its transpose
pub fn max_asymmetry(matrix: &DMatrix<f64>) -> f64 {
    (matrix - matrix.transpose())
        .iter()
        .fold(0.0_f64, |acc, v| acc.max(v.abs()))
}
