//! Metrics for evaluating forecast performance
//!
//! Every metric compares the common prefix of `actual` and `predicted` and
//! returns NaN when that prefix is empty.

pub use trade_math::statistics::round_to;

/// Mean squared error
pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len().min(predicted.len());
    if n == 0 {
        return f64::NAN;
    }
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / n as f64
}

/// Root mean squared error
pub fn root_mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    mean_squared_error(actual, predicted).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_basic_values() {
        let actual = [1.0, 2.0, 3.0, 4.0];
        let predicted = [1.0, 3.0, 2.0, 6.0];
        assert_abs_diff_eq!(mean_squared_error(&actual, &predicted), 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(
            root_mean_squared_error(&actual, &predicted),
            1.5_f64.sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_empty_is_nan() {
        assert!(root_mean_squared_error(&[], &[1.0]).is_nan());
        assert!(mean_squared_error(&[1.0], &[]).is_nan());
    }
}
