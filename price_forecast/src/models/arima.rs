//! ARIMA models for time series forecasting
//!
//! The series is differenced `d` times and an ARMA(p, q) is fitted to the
//! result by exact maximum likelihood. A constant is estimated only when no
//! differencing is applied. Forecasts are integrated back to the level of
//! the input and carry bounds from the model's own forecast variance.

use super::kalman;
use super::optimizer;
use super::state_space::StateSpace;
use crate::config::PipelineConfig;
use crate::data::ScaledSeries;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use crate::stationarity::DifferencingOrder;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use std::fmt;
use trade_math::statistics::{self, difference, is_constant};
use tracing::debug;

/// Autoregressive order used by the pipeline
pub const DEFAULT_AR_ORDER: usize = 5;

/// Moving-average order used by the pipeline
pub const DEFAULT_MA_ORDER: usize = 1;

/// `(p, d, q)` order of an ARIMA model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArimaOrder {
    /// Autoregressive order
    pub p: usize,
    /// Differencing order
    pub d: usize,
    /// Moving-average order
    pub q: usize,
}

impl ArimaOrder {
    /// Create an order
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// The default `(5, d, 1)` order for a chosen differencing order
    pub fn with_differencing(d: DifferencingOrder) -> Self {
        Self::new(DEFAULT_AR_ORDER, d.as_usize(), DEFAULT_MA_ORDER)
    }

    /// Shortest input series the model can be fitted to
    pub fn min_observations(&self) -> usize {
        self.d + self.p + self.q + 2
    }
}

impl fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.p, self.d, self.q)
    }
}

/// Optimizer limits and interval width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// Nelder-Mead iteration cap; reaching it is a fit failure
    pub max_iterations: u64,
    /// Simplex standard-deviation tolerance
    pub tolerance: f64,
    /// Coverage of the forecast bounds, in (0, 1)
    pub confidence_level: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_iterations: 5000,
            tolerance: 1e-8,
            confidence_level: 0.95,
        }
    }
}

impl From<&PipelineConfig> for FitOptions {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            max_iterations: config.max_iterations,
            tolerance: config.tolerance,
            confidence_level: config.confidence_level,
        }
    }
}

/// Unfitted ARIMA specification
#[derive(Debug, Clone)]
pub struct Arima {
    name: String,
    order: ArimaOrder,
    options: FitOptions,
}

impl Arima {
    /// Create a new ARIMA model with default fit options
    pub fn new(order: ArimaOrder) -> Self {
        Self::with_options(order, FitOptions::default())
    }

    /// Create a new ARIMA model with explicit fit options
    pub fn with_options(order: ArimaOrder, options: FitOptions) -> Self {
        Self {
            name: format!("ARIMA{}", order),
            order,
            options,
        }
    }

    /// The model order
    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    /// Estimate the model on `values` by exact maximum likelihood
    pub fn fit(&self, values: &[f64]) -> Result<FittedArima> {
        let ArimaOrder { p, d, q } = self.order;

        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::DataError(
                "Series contains non-finite values".to_string(),
            ));
        }
        if values.len() < self.order.min_observations() {
            return Err(ForecastError::InsufficientData {
                required: self.order.min_observations(),
                available: values.len(),
            });
        }

        // Last value at every differencing level, for integrating forecasts
        let mut tails = Vec::with_capacity(d);
        let mut working = values.to_vec();
        for _ in 0..d {
            tails.push(working[working.len() - 1]);
            working = difference(&working);
        }

        let scale = working.iter().fold(1.0_f64, |m, v| m.max(v.abs()));
        if is_constant(&working, 1e-12 * scale) {
            return Err(ForecastError::ModelFitFailure(format!(
                "series is constant after {} difference(s)",
                d
            )));
        }

        let mean = if d == 0 {
            statistics::mean(&working)?
        } else {
            0.0
        };
        let centered: Vec<f64> = working.iter().map(|v| v - mean).collect();

        let estimate = optimizer::estimate(
            &centered,
            p,
            q,
            self.options.max_iterations,
            self.options.tolerance,
        )?;
        let ss = StateSpace::new(&estimate.ar, &estimate.ma);
        let output = kalman::filter(&ss, &centered)?;

        debug!(
            order = %self.order,
            sigma2 = output.sigma2,
            log_likelihood = output.log_likelihood,
            iterations = estimate.iterations,
            "fitted ARIMA"
        );

        Ok(FittedArima {
            name: self.name.clone(),
            order: self.order,
            ar: estimate.ar,
            ma: estimate.ma,
            mean,
            sigma2: output.sigma2,
            log_likelihood: output.log_likelihood,
            iterations: estimate.iterations,
            nobs: centered.len(),
            residuals: output.residuals,
            next_state: output.next_state,
            tails,
            confidence_level: self.options.confidence_level,
        })
    }
}

impl ForecastModel for Arima {
    type Trained = FittedArima;

    fn train(&self, values: &[f64]) -> Result<FittedArima> {
        self.fit(values)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Fitted ARIMA model
#[derive(Debug, Clone)]
pub struct FittedArima {
    name: String,
    order: ArimaOrder,
    ar: Vec<f64>,
    ma: Vec<f64>,
    mean: f64,
    sigma2: f64,
    log_likelihood: f64,
    iterations: u64,
    nobs: usize,
    residuals: Vec<f64>,
    next_state: Array1<f64>,
    tails: Vec<f64>,
    confidence_level: f64,
}

impl FittedArima {
    /// The model order
    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    /// AR coefficients (`phi`)
    pub fn ar(&self) -> &[f64] {
        &self.ar
    }

    /// MA coefficients (`theta`)
    pub fn ma(&self) -> &[f64] {
        &self.ma
    }

    /// Estimated constant; zero whenever `d > 0`
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Innovation variance
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// Exact Gaussian log-likelihood of the differenced series
    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    /// Akaike information criterion; `sigma2` and the constant count as parameters
    pub fn aic(&self) -> f64 {
        let constant = usize::from(self.order.d == 0);
        let k = (self.order.p + self.order.q + 1 + constant) as f64;
        2.0 * k - 2.0 * self.log_likelihood
    }

    /// Nelder-Mead iterations used
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Observations after differencing
    pub fn nobs(&self) -> usize {
        self.nobs
    }

    /// One-step prediction errors of the differenced series
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// Point forecasts and bounds for the next `horizon` steps
    pub fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        if horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "Forecast horizon must be at least 1".to_string(),
            ));
        }

        let ss = StateSpace::new(&self.ar, &self.ma);
        let mut state = self.next_state.clone();
        let mut values = Vec::with_capacity(horizon);
        for _ in 0..horizon {
            values.push(state[0] + self.mean);
            state = ss.transition().dot(&state);
        }

        for &tail in self.tails.iter().rev() {
            let mut level = tail;
            for v in values.iter_mut() {
                level += *v;
                *v = level;
            }
        }

        let z = Normal::new(0.0, 1.0)
            .map_err(|e| ForecastError::ModelFitFailure(e.to_string()))?
            .inverse_cdf(1.0 - (1.0 - self.confidence_level) / 2.0);

        let mut cumulative = 0.0;
        let intervals = self
            .psi_weights(horizon)
            .iter()
            .zip(&values)
            .map(|(psi, &value)| {
                cumulative += psi * psi;
                let half_width = z * (self.sigma2 * cumulative).sqrt();
                (value - half_width, value + half_width)
            })
            .collect();

        ForecastResult::new_with_intervals(values, horizon, intervals)
    }

    /// MA(infinity) weights of the integrated model `phi(B) (1 - B)^d`
    fn psi_weights(&self, count: usize) -> Vec<f64> {
        // AR polynomial as 1 - a_1 B - a_2 B^2 - ..., multiplied by (1 - B)^d
        let mut poly = Vec::with_capacity(self.ar.len() + 1);
        poly.push(1.0);
        poly.extend(self.ar.iter().map(|a| -a));
        for _ in 0..self.order.d {
            let mut next = poly.clone();
            next.push(0.0);
            for i in 1..next.len() {
                next[i] -= poly[i - 1];
            }
            poly = next;
        }
        let phi: Vec<f64> = poly[1..].iter().map(|c| -c).collect();

        let mut psi = Vec::with_capacity(count);
        for j in 0..count {
            if j == 0 {
                psi.push(1.0);
                continue;
            }
            let theta = self.ma.get(j - 1).copied().unwrap_or(0.0);
            let ar_part: f64 = phi
                .iter()
                .take(j)
                .enumerate()
                .map(|(i, a)| a * psi[j - 1 - i])
                .sum();
            psi.push(theta + ar_part);
        }
        psi
    }
}

impl TrainedForecastModel for FittedArima {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        FittedArima::forecast(self, horizon)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Fit ARIMA(5, d, 1) to a scaled series and forecast `horizon` steps.
///
/// Values stay in scaled space. When the series carries dates, the result
/// is dated on consecutive calendar days after the last input date.
pub fn fit_and_forecast(
    scaled: &ScaledSeries,
    d: DifferencingOrder,
    horizon: usize,
) -> Result<ForecastResult> {
    fit_and_forecast_with(
        scaled,
        ArimaOrder::with_differencing(d),
        FitOptions::default(),
        horizon,
    )
}

/// [`fit_and_forecast`] with an explicit order and fit options
pub fn fit_and_forecast_with(
    scaled: &ScaledSeries,
    order: ArimaOrder,
    options: FitOptions,
    horizon: usize,
) -> Result<ForecastResult> {
    if horizon == 0 {
        return Err(ForecastError::InvalidParameter(
            "Forecast horizon must be at least 1".to_string(),
        ));
    }

    let fitted = Arima::with_options(order, options).fit(scaled.values())?;
    let result = fitted.forecast(horizon)?;

    match scaled.last_date() {
        Some(last) => result.with_dates_after(last),
        None => Ok(result),
    }
}

/// Order parameters as shown in [`ModelDescription`]
#[derive(Debug, Clone, Serialize)]
pub struct OrderDescription {
    pub p: usize,
    pub d: &'static str,
    pub q: usize,
}

/// Static description of the forecasting method
#[derive(Debug, Clone, Serialize)]
pub struct ModelDescription {
    pub model_type: &'static str,
    pub description: &'static str,
    pub parameters: OrderDescription,
    pub features: Vec<&'static str>,
    pub limitations: Vec<&'static str>,
}

/// Describe the model family, its parameters and its limits
pub fn model_description() -> ModelDescription {
    ModelDescription {
        model_type: "ARIMA (AutoRegressive Integrated Moving Average)",
        description: "Statistical time series model combining autoregression, \
                      differencing and a moving-average error term",
        parameters: OrderDescription {
            p: DEFAULT_AR_ORDER,
            d: "chosen by ADF test (0-2)",
            q: DEFAULT_MA_ORDER,
        },
        features: vec![
            "Differencing order chosen with the augmented Dickey-Fuller test",
            "7-day trailing rolling-mean smoothing",
            "Standard scaling before fitting",
            "Exact maximum-likelihood estimation",
            "Hold-out RMSE on the last 30 points",
            "Forecast bounds from the model's forecast variance",
            "Configurable horizon (default 30 days)",
        ],
        limitations: vec![
            "Assumes historical patterns continue",
            "Does not react to sudden market changes or external events",
            "Accuracy decreases with longer horizons",
            "Scoring needs at least 60 smoothed points",
            "Forecast dates are calendar days, not trading days",
        ],
    }
}
