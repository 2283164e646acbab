//! End-to-end forecasting pipeline
//!
//! smooth → choose d → scale → score → fit and forecast → unscale → report.
//! Every request is recomputed from the input series; nothing is cached.

use crate::config::PipelineConfig;
use crate::data::{PricePoint, PriceSeries};
use crate::error::{ForecastError, Result};
use crate::evaluation::{evaluate_with, EvaluationScore};
use crate::metrics::round_to;
use crate::models::arima::{fit_and_forecast_with, ArimaOrder, FitOptions};
use crate::preprocess::{scale, smooth_with_window};
use crate::source::PriceSource;
use crate::stationarity::analyze_differencing;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Decimal places of every price in a report
const PRICE_DECIMALS: u32 = 2;

/// One forecast step in price units
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted_price: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Summary of the fitted model and its evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub order: ArimaOrder,
    pub rmse: EvaluationScore,
    pub forecast_days: usize,
    /// Length of the smoothed series the model was fitted on
    pub data_points_used: usize,
    pub last_actual_price: f64,
    pub first_predicted_price: Option<f64>,
    pub stationarity_achieved: bool,
    /// Rounded ADF p-value of the series the model was fitted on
    pub adf_p_value: f64,
}

/// Everything returned for one prediction request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionReport {
    pub symbol: String,
    /// Trailing raw prices for display context
    pub historical: Vec<PricePoint>,
    pub predictions: Vec<ForecastPoint>,
    pub model_info: ModelInfo,
}

/// Configured forecasting pipeline; immutable and safe to share
#[derive(Debug, Clone, Default)]
pub struct ForecastPipeline {
    config: PipelineConfig,
}

impl ForecastPipeline {
    /// Create a pipeline after validating `config`
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Fetch `symbol` from `source` and [`predict`](Self::predict)
    pub fn predict_from_source<S: PriceSource + ?Sized>(
        &self,
        source: &S,
        symbol: &str,
        horizon: usize,
    ) -> Result<PredictionReport> {
        let series = source.fetch_series(symbol)?;
        if series.is_empty() {
            return Err(ForecastError::UpstreamDataUnavailable {
                symbol: symbol.to_uppercase(),
                reason: "source returned an empty series".to_string(),
            });
        }
        self.predict(symbol, &series, horizon)
    }

    /// Forecast `horizon` calendar days past the end of `series`
    pub fn predict(
        &self,
        symbol: &str,
        series: &PriceSeries,
        horizon: usize,
    ) -> Result<PredictionReport> {
        let config = &self.config;
        let symbol = symbol.to_uppercase();

        if horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "Forecast horizon must be at least 1".to_string(),
            ));
        }
        let required = config.min_history();
        if series.len() < required {
            return Err(ForecastError::InsufficientData {
                required,
                available: series.len(),
            });
        }

        let smoothed = smooth_with_window(series, config.smoothing_window)?;

        let decision = analyze_differencing(
            &smoothed.values(),
            config.significance,
            config.max_differencing,
        )?;
        let d = decision.order;
        if !decision.stationary {
            if config.refuse_non_stationary {
                return Err(ForecastError::NonStationary {
                    order: d.value(),
                    p_value: decision.final_p_value(),
                });
            }
            warn!(
                symbol = %symbol,
                order = d.value(),
                p_value = decision.final_p_value(),
                "series still non-stationary at the differencing cap, forecasting anyway"
            );
        }

        let (scaled, scaler) = scale(&smoothed)?;

        let score = evaluate_with(&scaled, d, config)?;
        if let EvaluationScore::Unscored {
            required,
            available,
        } = score
        {
            if config.require_score {
                return Err(ForecastError::InsufficientData {
                    required,
                    available,
                });
            }
            debug!(required, available, "history too short to score");
        }

        let order = ArimaOrder::new(config.ar_order, d.as_usize(), config.ma_order);
        let forecast =
            fit_and_forecast_with(&scaled, order, FitOptions::from(config), horizon)?;

        let dates = forecast.dates().ok_or_else(|| {
            ForecastError::DataError("forecast is missing its dates".to_string())
        })?;
        let bounds = forecast.intervals().ok_or_else(|| {
            ForecastError::DataError("forecast is missing its bounds".to_string())
        })?;

        let values = scaler.inverse_transform(forecast.values());
        let lower = scaler.inverse_transform(&bounds.iter().map(|b| b.0).collect::<Vec<_>>());
        let upper = scaler.inverse_transform(&bounds.iter().map(|b| b.1).collect::<Vec<_>>());

        let predictions: Vec<ForecastPoint> = dates
            .iter()
            .enumerate()
            .map(|(i, &date)| ForecastPoint {
                date,
                predicted_price: round_to(values[i], PRICE_DECIMALS),
                lower: round_to(lower[i], PRICE_DECIMALS),
                upper: round_to(upper[i], PRICE_DECIMALS),
            })
            .collect();

        let historical = series
            .tail(config.history_context)
            .iter()
            .map(|p| PricePoint::new(p.date, round_to(p.price, PRICE_DECIMALS)))
            .collect();

        let last_actual_price = series
            .last_price()
            .map(|p| round_to(p, PRICE_DECIMALS))
            .ok_or(ForecastError::InsufficientData {
                required,
                available: 0,
            })?;

        let model_info = ModelInfo {
            model_type: "ARIMA".to_string(),
            order,
            rmse: score,
            forecast_days: horizon,
            data_points_used: smoothed.len(),
            last_actual_price,
            first_predicted_price: predictions.first().map(|p| p.predicted_price),
            stationarity_achieved: decision.stationary,
            adf_p_value: decision.final_p_value(),
        };

        info!(
            symbol = %symbol,
            order = %order,
            rmse = ?score.rmse(),
            horizon,
            "forecast complete"
        );

        Ok(PredictionReport {
            symbol,
            historical,
            predictions,
            model_info,
        })
    }
}
