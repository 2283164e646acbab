//! Series preprocessing: rolling-mean smoothing and standard scaling

use crate::data::{PricePoint, PriceSeries, ScaledSeries, SmoothedSeries};
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use trade_math::moving_averages::rolling_mean;
use trade_math::statistics;
use tracing::debug;

/// Default smoothing window (one trading week plus weekend days)
pub const DEFAULT_WINDOW: usize = 7;

/// Relative standard deviation below which a series is treated as constant
const DEGENERATE_STD: f64 = 1e-12;

/// Smooth with the default 7-point trailing mean
pub fn smooth(series: &PriceSeries) -> Result<SmoothedSeries> {
    smooth_with_window(series, DEFAULT_WINDOW)
}

/// Trailing rolling mean over `window` consecutive points.
///
/// The first `window - 1` points have no full window and are dropped, so the
/// output is `series.len() - window + 1` long and keeps the input's dates
/// from index `window - 1` onwards.
pub fn smooth_with_window(series: &PriceSeries, window: usize) -> Result<SmoothedSeries> {
    if window == 0 {
        return Err(ForecastError::InvalidParameter(
            "Smoothing window must be positive".to_string(),
        ));
    }
    if series.len() < window {
        return Err(ForecastError::InsufficientData {
            required: window,
            available: series.len(),
        });
    }

    let means = rolling_mean(&series.prices(), window)?;
    let points = series.points()[window - 1..]
        .iter()
        .zip(means)
        .map(|(p, mean)| PricePoint::new(p.date, mean))
        .collect();

    debug!(input = series.len(), window, "smoothed price series");
    Ok(SmoothedSeries::new(PriceSeries::new(points)?, window))
}

/// Affine standardizer fit on one series: `z = (x - mean) / std_dev`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scaler {
    mean: f64,
    std_dev: f64,
}

impl Scaler {
    /// Fitted mean
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Fitted population standard deviation
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// Standardize values with the fitted parameters
    pub fn transform(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|v| (v - self.mean) / self.std_dev).collect()
    }

    /// Map standardized values back to price units
    pub fn inverse_transform(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|z| z * self.std_dev + self.mean).collect()
    }

    fn fit(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(ForecastError::InsufficientData {
                required: 1,
                available: 0,
            });
        }

        let mean = statistics::mean(values)?;
        let std_dev = statistics::population_std_dev(values)?;
        if !std_dev.is_finite() || std_dev <= DEGENERATE_STD * mean.abs().max(1.0) {
            return Err(ForecastError::DegenerateSeries(format!(
                "cannot scale a series with zero variance (all {} values equal {})",
                values.len(),
                mean
            )));
        }

        Ok(Self { mean, std_dev })
    }
}

/// Fit a scaler on the entire smoothed series and standardize it
pub fn scale(series: &SmoothedSeries) -> Result<(ScaledSeries, Scaler)> {
    let values = series.values();
    let scaler = Scaler::fit(&values)?;
    let scaled = ScaledSeries::new(Some(series.dates()), scaler.transform(&values));
    debug!(mean = scaler.mean, std_dev = scaler.std_dev, "fitted scaler");
    Ok((scaled, scaler))
}

/// Fit a scaler on undated values and standardize them
pub fn scale_values(values: &[f64]) -> Result<(ScaledSeries, Scaler)> {
    let scaler = Scaler::fit(values)?;
    Ok((ScaledSeries::new(None, scaler.transform(values)), scaler))
}

/// Inverse of [`scale`]: map standardized values back to price units
pub fn unscale(scaler: &Scaler, values: &[f64]) -> Vec<f64> {
    scaler.inverse_transform(values)
}

/// Inverse-transform values and attach them to dates
pub fn unscale_series(scaler: &Scaler, dates: &[NaiveDate], values: &[f64]) -> Result<PriceSeries> {
    PriceSeries::from_parts(dates.to_vec(), unscale(scaler, values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn series(prices: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let dates = (0..prices.len())
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect();
        PriceSeries::from_parts(dates, prices.to_vec()).unwrap()
    }

    #[test]
    fn test_smooth_keeps_trailing_dates() {
        let raw = series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        let smoothed = smooth(&raw).unwrap();

        assert_eq!(smoothed.len(), 3);
        assert_eq!(smoothed.window(), 7);
        assert_eq!(smoothed.dates()[0], raw.dates()[6]);
        assert_eq!(smoothed.last_date(), raw.last_date());
        assert_abs_diff_eq!(smoothed.values()[0], 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(smoothed.values()[2], 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_smooth_too_short() {
        let raw = series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let err = smooth(&raw).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::InsufficientData {
                required: 7,
                available: 6
            }
        ));
    }

    #[test]
    fn test_scale_statistics() {
        let raw = series(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        let smoothed = smooth_with_window(&raw, 1).unwrap();
        let (scaled, scaler) = scale(&smoothed).unwrap();

        assert_abs_diff_eq!(scaler.mean(), 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(scaler.std_dev(), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(scaled.values()[0], -1.5, epsilon = 1e-12);

        let mean: f64 = scaled.values().iter().sum::<f64>() / scaled.len() as f64;
        assert_abs_diff_eq!(mean, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_scale_constant_is_degenerate() {
        let err = scale_values(&[3.0; 10]).unwrap_err();
        assert!(matches!(err, ForecastError::DegenerateSeries(_)));
    }

    #[test]
    fn test_unscale_series_attaches_dates() {
        let (scaled, scaler) = scale_values(&[10.0, 20.0, 30.0]).unwrap();
        let dates = series(&[0.0, 0.0, 0.0]).dates();
        let restored = unscale_series(&scaler, &dates, scaled.values()).unwrap();
        assert_abs_diff_eq!(restored.prices()[2], 30.0, epsilon = 1e-9);
        assert_eq!(restored.dates(), dates);
    }
}
