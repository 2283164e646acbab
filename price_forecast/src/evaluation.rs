//! Hold-out evaluation of the forecasting model
//!
//! The last `holdout` points are hidden, the model is re-fitted to the rest,
//! and the forecast over the hidden part is scored by RMSE in scaled space.

use crate::config::PipelineConfig;
use crate::data::ScaledSeries;
use crate::error::{ForecastError, Result};
use crate::metrics::{root_mean_squared_error, round_to};
use crate::models::arima::{Arima, ArimaOrder, FitOptions};
use crate::stationarity::DifferencingOrder;
use crate::utils::train_test_split;
use serde::Serialize;
use tracing::debug;

/// Points hidden from the model during evaluation
pub const DEFAULT_HOLDOUT: usize = 30;

/// Shortest series that is scored
pub const MIN_EVALUATION_POINTS: usize = 60;

/// Outcome of scoring a series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EvaluationScore {
    /// Hold-out RMSE, rounded to two decimals
    Scored { rmse: f64 },
    /// History too short for a hold-out split
    Unscored { required: usize, available: usize },
}

impl EvaluationScore {
    /// The RMSE, if the series was scored
    pub fn rmse(&self) -> Option<f64> {
        match self {
            EvaluationScore::Scored { rmse } => Some(*rmse),
            EvaluationScore::Unscored { .. } => None,
        }
    }
}

/// Hold-out RMSE of ARIMA(5, d, 1) with the default split
pub fn evaluate(scaled: &ScaledSeries, d: DifferencingOrder) -> Result<f64> {
    holdout_rmse(
        scaled,
        ArimaOrder::with_differencing(d),
        FitOptions::default(),
        DEFAULT_HOLDOUT,
        MIN_EVALUATION_POINTS,
    )
}

/// Like [`evaluate`], with the insufficient-history case as a value
pub fn score(scaled: &ScaledSeries, d: DifferencingOrder) -> Result<EvaluationScore> {
    into_score(evaluate(scaled, d))
}

/// Score with order, split and fit options taken from `config`
pub fn evaluate_with(
    scaled: &ScaledSeries,
    d: DifferencingOrder,
    config: &PipelineConfig,
) -> Result<EvaluationScore> {
    let order = ArimaOrder::new(config.ar_order, d.as_usize(), config.ma_order);
    into_score(holdout_rmse(
        scaled,
        order,
        FitOptions::from(config),
        config.holdout,
        config.min_evaluation_points,
    ))
}

fn into_score(result: Result<f64>) -> Result<EvaluationScore> {
    match result {
        Ok(rmse) => Ok(EvaluationScore::Scored { rmse }),
        Err(ForecastError::InsufficientData {
            required,
            available,
        }) => Ok(EvaluationScore::Unscored {
            required,
            available,
        }),
        Err(e) => Err(e),
    }
}

fn holdout_rmse(
    scaled: &ScaledSeries,
    order: ArimaOrder,
    options: FitOptions,
    holdout: usize,
    min_points: usize,
) -> Result<f64> {
    let required = min_points.max(holdout + 1);
    if scaled.len() < required {
        return Err(ForecastError::InsufficientData {
            required,
            available: scaled.len(),
        });
    }

    let (train, test) = train_test_split(scaled.values(), holdout);
    let fitted = Arima::with_options(order, options).fit(&train)?;
    let forecast = fitted.forecast(test.len())?;

    let rmse = round_to(root_mean_squared_error(&test, forecast.values()), 2);
    if !rmse.is_finite() {
        return Err(ForecastError::ModelFitFailure(
            "hold-out forecast produced a non-finite error".to_string(),
        ));
    }

    debug!(train = train.len(), test = test.len(), rmse, "evaluated hold-out");
    Ok(rmse)
}
