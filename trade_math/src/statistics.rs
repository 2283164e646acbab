//! Descriptive statistics and series transforms
//!
//! Population and sample moments, differencing, and decimal rounding shared
//! by the preprocessing, evaluation and indicator code.

use crate::{MathError, Result};

/// Arithmetic mean of `values`
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot compute the mean of an empty slice".to_string(),
        ));
    }

    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population variance (divides by `n`, not `n - 1`)
pub fn population_variance(values: &[f64]) -> Result<f64> {
    let mu = mean(values)?;
    let ss = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>();
    Ok(ss / values.len() as f64)
}

/// Population standard deviation
pub fn population_std_dev(values: &[f64]) -> Result<f64> {
    Ok(population_variance(values)?.sqrt())
}

/// Sample standard deviation (divides by `n - 1`)
pub fn sample_std_dev(values: &[f64]) -> Result<f64> {
    if values.len() < 2 {
        return Err(MathError::InsufficientData(format!(
            "Sample standard deviation needs at least 2 values, have {}",
            values.len()
        )));
    }
    let mu = mean(values)?;
    let ss = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>();
    Ok((ss / (values.len() - 1) as f64).sqrt())
}

/// First difference: `out[i] = values[i + 1] - values[i]`
///
/// The result is one element shorter than the input; the undefined leading
/// difference is dropped.
pub fn difference(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Round to a fixed number of decimal places (half away from zero)
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Whether every value lies within `tolerance` of the first one
pub fn is_constant(values: &[f64], tolerance: f64) -> bool {
    match values.first() {
        Some(first) => values.iter().all(|v| (v - first).abs() <= tolerance),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_variance() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&values).unwrap(), 5.0);
        assert_eq!(population_variance(&values).unwrap(), 4.0);
        assert_eq!(population_std_dev(&values).unwrap(), 2.0);
    }

    #[test]
    fn test_sample_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((sample_std_dev(&values).unwrap() - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
        assert!(sample_std_dev(&[1.0]).is_err());
    }

    #[test]
    fn test_mean_empty() {
        assert!(mean(&[]).is_err());
    }

    #[test]
    fn test_difference() {
        assert_eq!(difference(&[1.0, 4.0, 9.0, 16.0]), vec![3.0, 5.0, 7.0]);
        assert!(difference(&[1.0]).is_empty());
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 3), 1.235);
        assert_eq!(round_to(-2.346, 2), -2.35);
        assert_eq!(round_to(7.0, 2), 7.0);
    }

    #[test]
    fn test_is_constant() {
        assert!(is_constant(&[3.0, 3.0, 3.0], 0.0));
        assert!(!is_constant(&[3.0, 3.1], 1e-9));
        assert!(is_constant(&[], 0.0));
    }
}
