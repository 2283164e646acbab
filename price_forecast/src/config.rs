//! Pipeline configuration
//!
//! Every tunable of the forecasting pipeline lives here. Defaults reproduce
//! the standard ARIMA(5, d, 1) setup with a 7-day smoothing window and a
//! 30-day hold-out.

use crate::error::{ForecastError, Result};
use crate::models::arima::ArimaOrder;
use crate::stationarity::MIN_ADF_OBSERVATIONS;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for [`crate::pipeline::ForecastPipeline`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Trailing rolling-mean window
    pub smoothing_window: usize,
    /// Autoregressive order (p)
    pub ar_order: usize,
    /// Moving-average order (q)
    pub ma_order: usize,
    /// Upper bound on the differencing order (d)
    pub max_differencing: u8,
    /// ADF p-value at or below which a series counts as stationary
    pub significance: f64,
    /// Number of trailing points held out for evaluation
    pub holdout: usize,
    /// Minimum series length for a hold-out evaluation
    pub min_evaluation_points: usize,
    /// Horizon used when the caller does not supply one
    pub default_horizon: usize,
    /// Trailing raw points echoed back in the report
    pub history_context: usize,
    /// Coverage of the forecast bounds
    pub confidence_level: f64,
    /// Nelder-Mead iteration cap for likelihood maximisation
    pub max_iterations: u64,
    /// Nelder-Mead convergence tolerance (std. dev. of simplex costs)
    pub tolerance: f64,
    /// Fail instead of forecasting when the differencing cap is reached
    /// without a stationary series
    pub refuse_non_stationary: bool,
    /// Treat a too-short history for evaluation as an error instead of
    /// reporting the forecast as unscored
    pub require_score: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            smoothing_window: 7,
            ar_order: 5,
            ma_order: 1,
            max_differencing: 2,
            significance: 0.05,
            holdout: 30,
            min_evaluation_points: 60,
            default_horizon: 30,
            history_context: 60,
            confidence_level: 0.95,
            max_iterations: 5000,
            tolerance: 1e-8,
            refuse_non_stationary: false,
            require_score: false,
        }
    }
}

impl PipelineConfig {
    /// Parse a TOML document; missing keys take their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: PipelineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Fewest raw prices a forecast can be built from.
    ///
    /// Smoothing drops `smoothing_window - 1` leading points. What is left
    /// must satisfy both the ADF test after the largest allowed number of
    /// differences and the ARIMA fit at that differencing order.
    pub fn min_history(&self) -> usize {
        let d = usize::from(self.max_differencing);
        let adf = MIN_ADF_OBSERVATIONS + d;
        let arima = ArimaOrder::new(self.ar_order, d, self.ma_order).min_observations();
        self.smoothing_window - 1 + adf.max(arima)
    }

    /// Check parameter ranges
    pub fn validate(&self) -> Result<()> {
        if self.smoothing_window == 0 {
            return Err(ForecastError::ConfigError(
                "smoothing_window must be at least 1".to_string(),
            ));
        }
        if self.max_differencing > 2 {
            return Err(ForecastError::ConfigError(format!(
                "max_differencing must be 0, 1 or 2, got {}",
                self.max_differencing
            )));
        }
        if !(self.significance > 0.0 && self.significance < 1.0) {
            return Err(ForecastError::ConfigError(format!(
                "significance must be in (0, 1), got {}",
                self.significance
            )));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(ForecastError::ConfigError(format!(
                "confidence_level must be in (0, 1), got {}",
                self.confidence_level
            )));
        }
        if self.holdout == 0 {
            return Err(ForecastError::ConfigError(
                "holdout must be at least 1".to_string(),
            ));
        }
        if self.min_evaluation_points <= self.holdout {
            return Err(ForecastError::ConfigError(format!(
                "min_evaluation_points ({}) must exceed holdout ({})",
                self.min_evaluation_points, self.holdout
            )));
        }
        if self.default_horizon == 0 {
            return Err(ForecastError::ConfigError(
                "default_horizon must be at least 1".to_string(),
            ));
        }
        if self.max_iterations == 0 || !(self.tolerance > 0.0) {
            return Err(ForecastError::ConfigError(
                "max_iterations and tolerance must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
