//! Utility functions for the price_forecast crate

use crate::error::{ForecastError, Result};
use chrono::{Duration, NaiveDate};

/// Split a series into a training prefix and a test suffix of `test_size`
/// points. A `test_size` of zero or at least the series length leaves the
/// whole series in the training part.
pub fn train_test_split(data: &[f64], test_size: usize) -> (Vec<f64>, Vec<f64>) {
    if test_size == 0 || test_size >= data.len() {
        return (data.to_vec(), Vec::new());
    }

    let train_size = data.len() - test_size;
    (data[..train_size].to_vec(), data[train_size..].to_vec())
}

/// `horizon` consecutive calendar days starting the day after `last_date`.
///
/// Weekends and holidays are not skipped.
pub fn future_dates(last_date: NaiveDate, horizon: usize) -> Result<Vec<NaiveDate>> {
    let mut dates = Vec::with_capacity(horizon);
    let mut current = last_date;

    for _ in 0..horizon {
        current = current
            .checked_add_signed(Duration::days(1))
            .ok_or_else(|| {
                ForecastError::InvalidParameter(format!(
                    "Forecast dates overflow after {}",
                    current
                ))
            })?;
        dates.push(current);
    }

    Ok(dates)
}
