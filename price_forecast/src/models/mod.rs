//! Forecasting models for time series data

use crate::error::{ForecastError, Result};
use crate::utils::future_dates;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Debug;

/// Forecast result containing predicted values
#[derive(Debug, Clone, Serialize)]
pub struct ForecastResult {
    /// Forecasted values
    pub(crate) values: Vec<f64>,
    /// Number of periods forecasted
    horizons: usize,
    /// Lower and upper bound per step (optional)
    pub(crate) intervals: Option<Vec<(f64, f64)>>,
    /// Calendar dates of the forecast steps (optional)
    pub(crate) dates: Option<Vec<NaiveDate>>,
}

impl ForecastResult {
    /// Create a new forecast result
    pub fn new(values: Vec<f64>, horizons: usize) -> Result<Self> {
        if values.len() != horizons {
            return Err(ForecastError::DataError(format!(
                "Values length ({}) doesn't match horizons ({})",
                values.len(),
                horizons
            )));
        }

        Ok(Self {
            values,
            horizons,
            intervals: None,
            dates: None,
        })
    }

    /// Create a new forecast result with per-step bounds
    pub fn new_with_intervals(
        values: Vec<f64>,
        horizons: usize,
        intervals: Vec<(f64, f64)>,
    ) -> Result<Self> {
        let mut result = Self::new(values, horizons)?;

        if result.values.len() != intervals.len() {
            return Err(ForecastError::DataError(format!(
                "Values length ({}) doesn't match intervals length ({})",
                result.values.len(),
                intervals.len()
            )));
        }

        result.intervals = Some(intervals);
        Ok(result)
    }

    /// Attach consecutive calendar dates starting the day after `last_date`
    pub fn with_dates_after(mut self, last_date: NaiveDate) -> Result<Self> {
        self.dates = Some(future_dates(last_date, self.horizons)?);
        Ok(self)
    }

    /// Get the forecasted values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the number of periods forecasted
    pub fn horizons(&self) -> usize {
        self.horizons
    }

    /// Number of forecast steps
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the forecast is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get the bounds, if available
    pub fn intervals(&self) -> Option<&[(f64, f64)]> {
        self.intervals.as_deref()
    }

    /// Get the forecast dates, if available
    pub fn dates(&self) -> Option<&[NaiveDate]> {
        self.dates.as_deref()
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Generate forecast for future periods
    fn forecast(&self, horizons: usize) -> Result<ForecastResult>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a series of values
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on a series of values
    fn train(&self, values: &[f64]) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod arima;

pub(crate) mod kalman;
pub(crate) mod optimizer;
pub(crate) mod params;
pub(crate) mod state_space;

pub use arima::{fit_and_forecast, model_description, Arima, ArimaOrder, FittedArima};
