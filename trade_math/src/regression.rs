//! Ordinary least squares regression
//!
//! Small dense OLS solver used by the unit-root test. Regressors are passed
//! column-wise; the caller adds its own intercept column when one is wanted.

use crate::{MathError, Result};
use std::f64::consts::PI;

/// Result of an ordinary least squares fit
#[derive(Debug, Clone)]
pub struct OlsFit {
    coefficients: Vec<f64>,
    std_errors: Vec<f64>,
    ssr: f64,
    nobs: usize,
}

impl OlsFit {
    /// Estimated coefficients, one per regressor column
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Standard errors of the coefficients
    pub fn std_errors(&self) -> &[f64] {
        &self.std_errors
    }

    /// t-statistic of coefficient `index`
    pub fn t_value(&self, index: usize) -> Option<f64> {
        let beta = *self.coefficients.get(index)?;
        let se = *self.std_errors.get(index)?;
        Some(beta / se)
    }

    /// Sum of squared residuals
    pub fn ssr(&self) -> f64 {
        self.ssr
    }

    /// Number of observations used
    pub fn nobs(&self) -> usize {
        self.nobs
    }

    /// Number of estimated coefficients
    pub fn n_params(&self) -> usize {
        self.coefficients.len()
    }

    /// Gaussian log-likelihood evaluated at the OLS estimates
    pub fn log_likelihood(&self) -> f64 {
        let n = self.nobs as f64;
        -0.5 * n * ((2.0 * PI).ln() + (self.ssr / n).ln() + 1.0)
    }

    /// Akaike Information Criterion, `2k - 2 ln L`
    pub fn aic(&self) -> f64 {
        2.0 * self.n_params() as f64 - 2.0 * self.log_likelihood()
    }
}

/// Fit `y = X b + e` by least squares.
///
/// `columns` holds the regressors, each the same length as `y`.
pub fn ols(y: &[f64], columns: &[Vec<f64>]) -> Result<OlsFit> {
    let n = y.len();
    let k = columns.len();

    if k == 0 {
        return Err(MathError::InvalidInput(
            "Regression needs at least one regressor".to_string(),
        ));
    }
    if let Some(bad) = columns.iter().find(|c| c.len() != n) {
        return Err(MathError::InvalidInput(format!(
            "Regressor length {} does not match response length {}",
            bad.len(),
            n
        )));
    }
    if n <= k {
        return Err(MathError::InsufficientData(format!(
            "Regression with {} regressors needs more than {} observations, have {}",
            k, k, n
        )));
    }

    // Normal equations X'X b = X'y
    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];
    for i in 0..k {
        for j in i..k {
            let s: f64 = columns[i].iter().zip(&columns[j]).map(|(a, b)| a * b).sum();
            xtx[i][j] = s;
            xtx[j][i] = s;
        }
        xty[i] = columns[i].iter().zip(y).map(|(a, b)| a * b).sum();
    }

    let inverse = invert(&xtx)?;
    let coefficients: Vec<f64> = inverse
        .iter()
        .map(|row| row.iter().zip(&xty).map(|(a, b)| a * b).sum())
        .collect();

    let ssr: f64 = (0..n)
        .map(|t| {
            let fitted: f64 = columns
                .iter()
                .zip(&coefficients)
                .map(|(col, b)| col[t] * b)
                .sum();
            (y[t] - fitted).powi(2)
        })
        .sum();

    let tss_scale: f64 = y.iter().map(|v| v * v).sum();
    if !ssr.is_finite() || ssr <= 1e-24 * tss_scale.max(1.0) {
        return Err(MathError::CalculationError(
            "Regression residuals vanish; the response is an exact linear combination of the regressors"
                .to_string(),
        ));
    }

    let sigma2 = ssr / (n - k) as f64;
    let std_errors = (0..k).map(|i| (sigma2 * inverse[i][i]).sqrt()).collect();

    Ok(OlsFit {
        coefficients,
        std_errors,
        ssr,
        nobs: n,
    })
}

/// Gauss-Jordan inversion with partial pivoting
fn invert(matrix: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
    let k = matrix.len();
    let scale = matrix
        .iter()
        .enumerate()
        .map(|(i, row)| row[i].abs())
        .fold(0.0_f64, f64::max)
        .max(f64::MIN_POSITIVE);

    let mut a: Vec<Vec<f64>> = matrix.to_vec();
    let mut inv: Vec<Vec<f64>> = (0..k)
        .map(|i| (0..k).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();

    for col in 0..k {
        let pivot_row = (col..k)
            .max_by(|&r1, &r2| a[r1][col].abs().total_cmp(&a[r2][col].abs()))
            .unwrap_or(col);

        if a[pivot_row][col].abs() <= 1e-12 * scale {
            return Err(MathError::SingularMatrix(format!(
                "Design matrix is rank deficient at column {}",
                col
            )));
        }

        a.swap(col, pivot_row);
        inv.swap(col, pivot_row);

        let pivot = a[col][col];
        for j in 0..k {
            a[col][j] /= pivot;
            inv[col][j] /= pivot;
        }

        for row in 0..k {
            if row == col {
                continue;
            }
            let factor = a[row][col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..k {
                a[row][j] -= factor * a[col][j];
                inv[row][j] -= factor * inv[col][j];
            }
        }
    }

    Ok(inv)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ones(n: usize) -> Vec<f64> {
        vec![1.0; n]
    }

    #[test]
    fn test_simple_line() {
        // y = 2 + 3x with a small alternating perturbation
        let x: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, xi)| 2.0 + 3.0 * xi + if i % 2 == 0 { 0.01 } else { -0.01 })
            .collect();

        let fit = ols(&y, &[ones(20), x]).unwrap();
        assert!((fit.coefficients()[0] - 2.0).abs() < 0.05);
        assert!((fit.coefficients()[1] - 3.0).abs() < 0.01);
        assert_eq!(fit.nobs(), 20);
        assert_eq!(fit.n_params(), 2);
        assert!(fit.t_value(1).unwrap() > 100.0);
    }

    #[test]
    fn test_known_standard_error() {
        // Intercept-only regression: coefficient is the mean, se = s / sqrt(n)
        let y = [1.0, 2.0, 3.0, 4.0, 5.0];
        let fit = ols(&y, &[ones(5)]).unwrap();

        let sample_var = 2.5; // sum of squares 10 over n - 1 = 4
        let expected_se = (sample_var / 5.0_f64).sqrt();
        assert!((fit.coefficients()[0] - 3.0).abs() < 1e-12);
        assert!((fit.std_errors()[0] - expected_se).abs() < 1e-12);
        assert!((fit.ssr() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_aic_penalises_parameters() {
        let y = [1.0, 2.5, 2.0, 4.5, 5.0, 5.5, 7.5, 8.0];
        let x: Vec<f64> = (0..8).map(|i| i as f64).collect();
        let noise = vec![0.3, -0.1, 0.2, 0.0, -0.4, 0.1, 0.05, -0.2];

        let small = ols(&y, &[ones(8), x.clone()]).unwrap();
        let large = ols(&y, &[ones(8), x, noise]).unwrap();

        assert!(large.ssr() <= small.ssr());
        let expected_gap = 2.0 + 2.0 * (small.log_likelihood() - large.log_likelihood());
        assert!((large.aic() - small.aic() - expected_gap).abs() < 1e-9);
    }

    #[test]
    fn test_singular_design() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| v * 0.5 + (v * 1.7).sin()).collect();
        let result = ols(&y, &[x.clone(), x]);
        assert!(matches!(result, Err(MathError::SingularMatrix(_))));
    }

    #[test]
    fn test_too_few_observations() {
        let result = ols(&[1.0, 2.0], &[ones(2), vec![0.0, 1.0]]);
        assert!(matches!(result, Err(MathError::InsufficientData(_))));
    }

    #[test]
    fn test_length_mismatch() {
        let result = ols(&[1.0, 2.0, 3.0], &[ones(2)]);
        assert!(matches!(result, Err(MathError::InvalidInput(_))));
    }

    #[test]
    fn test_perfect_fit_rejected() {
        let x: Vec<f64> = (0..6).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 1.0 + 2.0 * v).collect();
        let result = ols(&y, &[ones(6), x]);
        assert!(matches!(result, Err(MathError::CalculationError(_))));
    }
}
