//! Small dense linear solves.
//!
//! The partial autocorrelation needs one Yule-Walker system per lag:
//!
//! ```text
//! R_k φ = r_k,   R_k[i][j] = ρ(|i - j|),   r_k[i] = ρ(i + 1)
//! ```
//!
//! `k` never exceeds a few dozen, so we solve each system directly with SVD,
//! which also copes with the near-singular matrices produced by series that are
//! almost constant.

use nalgebra::{DMatrix, DVector};

/// Solve `x · β = y` in the least-squares sense using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Symmetric Toeplitz matrix whose first row is `first_row`.
pub fn toeplitz(first_row: &[f64]) -> DMatrix<f64> {
    let k = first_row.len();
    DMatrix::from_fn(k, k, |i, j| first_row[i.abs_diff(j)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn toeplitz_is_symmetric_with_unit_diagonal() {
        let m = toeplitz(&[1.0, 0.5, 0.25]);
        assert_eq!(m[(0, 0)], 1.0);
        assert_eq!(m[(2, 2)], 1.0);
        assert_eq!(m[(0, 2)], 0.25);
        assert_eq!(m[(2, 0)], 0.25);
        assert_eq!(m[(1, 2)], 0.5);
    }
}
