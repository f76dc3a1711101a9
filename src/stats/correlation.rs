//! Sample autocorrelation and partial autocorrelation.
//!
//! Both use biased (denominator `n`) autocovariances of the demeaned series, so
//! the implied autocorrelation matrix is always positive semi-definite.
//!
//! Confidence bands are 95% half-widths around zero:
//!
//! ```text
//! acf:   var[0] = 0, var[1] = 1/n, var[k] = (1 + 2 Σ_{j=1}^{k-1} acf[j]^2) / n   (Bartlett)
//! pacf:  ±z / √n for k ≥ 1
//! ```

use nalgebra::DVector;

use crate::math::{solve_least_squares, toeplitz};
use crate::stats::mean;

/// Two-sided 95% normal quantile.
pub const Z_95: f64 = 1.959_963_984_540_054;

/// Autocorrelation at lags `0..=nlags`.
///
/// A constant series has no variance to normalise by; its correlogram is 1 at
/// lag 0 and 0 elsewhere.
pub fn acf(values: &[f64], nlags: usize) -> Vec<f64> {
    let acov = autocovariance(values, nlags);
    let c0 = acov[0];
    let constant = values.windows(2).all(|w| w[0] == w[1]);
    if constant || c0 <= 0.0 {
        let mut out = vec![0.0; nlags + 1];
        out[0] = 1.0;
        return out;
    }
    acov.iter().map(|c| c / c0).collect()
}

/// Bartlett 95% half-widths for an autocorrelation computed from `n` values.
pub fn acf_band(acf: &[f64], n: usize) -> Vec<f64> {
    let n = n.max(1) as f64;
    let mut band = Vec::with_capacity(acf.len());
    let mut sum_sq = 0.0;
    for k in 0..acf.len() {
        let var = match k {
            0 => 0.0,
            _ => {
                if k >= 2 {
                    sum_sq += acf[k - 1] * acf[k - 1];
                }
                (1.0 + 2.0 * sum_sq) / n
            }
        };
        band.push(Z_95 * var.sqrt());
    }
    band
}

/// Partial autocorrelation at lags `0..=nlags` via Yule-Walker.
///
/// For each lag `k` the order-`k` system `R_k φ = r_k` is solved and `φ_k` is the
/// partial autocorrelation. Systems that cannot be solved robustly yield 0.
pub fn pacf(values: &[f64], nlags: usize) -> Vec<f64> {
    let rho = acf(values, nlags);
    let mut out = Vec::with_capacity(nlags + 1);
    out.push(1.0);
    for k in 1..=nlags {
        let r = toeplitz(&rho[..k]);
        let rhs = DVector::from_column_slice(&rho[1..=k]);
        let phi = solve_least_squares(&r, &rhs)
            .map(|phi| phi[k - 1])
            .unwrap_or(0.0);
        out.push(phi);
    }
    out
}

/// 95% half-widths for a partial autocorrelation from `n` values.
pub fn pacf_band(n: usize, nlags: usize) -> Vec<f64> {
    let half = Z_95 / (n.max(1) as f64).sqrt();
    (0..=nlags).map(|k| if k == 0 { 0.0 } else { half }).collect()
}

fn autocovariance(values: &[f64], nlags: usize) -> Vec<f64> {
    let n = values.len();
    if n == 0 {
        return vec![0.0; nlags + 1];
    }
    let mu = mean(values);
    let dev: Vec<f64> = values.iter().map(|v| v - mu).collect();
    (0..=nlags)
        .map(|k| {
            if k >= n {
                return 0.0;
            }
            dev.iter().zip(&dev[k..]).map(|(a, b)| a * b).sum::<f64>() / n as f64
        })
        .collect()
}
