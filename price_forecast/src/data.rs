//! Price series types for forecasting
//!
//! A single strongly-typed shape, ordered `(date, value)` pairs, flows
//! through every stage. Each stage's output gets its own type so that a
//! smoothed or scaled series cannot be confused with raw prices.

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily closing price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading date
    pub date: NaiveDate,
    /// Closing price
    pub price: f64,
}

impl PricePoint {
    /// Create a new price point
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// Ordered daily closing prices with strictly increasing dates.
///
/// Gaps (weekends, holidays) are allowed; duplicate or out-of-order dates
/// and non-finite prices are rejected at construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Create a series from points, validating order and values
    pub fn new(points: Vec<PricePoint>) -> Result<Self> {
        validate_points(&points)?;
        Ok(Self { points })
    }

    /// Create a series from parallel date and price vectors
    pub fn from_parts(dates: Vec<NaiveDate>, prices: Vec<f64>) -> Result<Self> {
        if dates.len() != prices.len() {
            return Err(ForecastError::DataError(format!(
                "Dates length ({}) doesn't match prices length ({})",
                dates.len(),
                prices.len()
            )));
        }

        let points = dates
            .into_iter()
            .zip(prices)
            .map(|(date, price)| PricePoint { date, price })
            .collect();
        Self::new(points)
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no observations
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All points in date order
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Dates in order
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// Closing prices in date order
    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    /// First date, if any
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    /// Last date, if any
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Last closing price, if any
    pub fn last_price(&self) -> Option<f64> {
        self.points.last().map(|p| p.price)
    }

    /// The trailing `n` points (or the whole series if shorter)
    pub fn tail(&self, n: usize) -> &[PricePoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }
}

impl<'de> Deserialize<'de> for PriceSeries {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let points = Vec::<PricePoint>::deserialize(deserializer)?;
        PriceSeries::new(points).map_err(serde::de::Error::custom)
    }
}

fn validate_points(points: &[PricePoint]) -> Result<()> {
    if let Some(bad) = points.iter().find(|p| !p.price.is_finite()) {
        return Err(ForecastError::DataError(format!(
            "Non-finite price {} on {}",
            bad.price, bad.date
        )));
    }

    if let Some(pair) = points.windows(2).find(|w| w[1].date <= w[0].date) {
        return Err(ForecastError::DataError(format!(
            "Dates must be strictly increasing: {} is followed by {}",
            pair[0].date, pair[1].date
        )));
    }

    Ok(())
}

/// Trailing rolling mean of a [`PriceSeries`].
///
/// Indexed by the input's dates minus the dropped `window - 1` prefix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmoothedSeries {
    series: PriceSeries,
    window: usize,
}

impl SmoothedSeries {
    pub(crate) fn new(series: PriceSeries, window: usize) -> Self {
        Self { series, window }
    }

    /// Window length used for smoothing
    pub fn window(&self) -> usize {
        self.window
    }

    /// The smoothed values as a price series
    pub fn as_series(&self) -> &PriceSeries {
        &self.series
    }

    /// Number of smoothed points
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Whether no smoothed points exist
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Smoothed values in date order
    pub fn values(&self) -> Vec<f64> {
        self.series.prices()
    }

    /// Dates of the smoothed values
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.series.dates()
    }

    /// Last date, if any
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.series.last_date()
    }
}

/// A standardized series (zero mean, unit variance).
///
/// Only produced by [`crate::preprocess::scale`], always alongside the
/// scaler that was fit on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaledSeries {
    dates: Option<Vec<NaiveDate>>,
    values: Vec<f64>,
}

impl ScaledSeries {
    pub(crate) fn new(dates: Option<Vec<NaiveDate>>, values: Vec<f64>) -> Self {
        Self { dates, values }
    }

    /// Standardized values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Dates, when the series was scaled from dated input
    pub fn dates(&self) -> Option<&[NaiveDate]> {
        self.dates.as_deref()
    }

    /// Last date, if known
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.as_ref().and_then(|d| d.last().copied())
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
