//! Stationarity analysis
//!
//! Augmented Dickey-Fuller unit-root test (constant, no trend) with lag
//! length chosen by AIC, and the iterative policy that picks how many first
//! differences a series needs before the test rejects a unit root.

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use std::fmt;
use trade_math::statistics::{difference, is_constant, round_to};
use trade_math::{ols, MathError, OlsFit};
use tracing::debug;

/// Significance level used by [`choose_differencing_order`]
pub const DEFAULT_SIGNIFICANCE: f64 = 0.05;

/// Highest differencing order the policy will apply
pub const MAX_DIFFERENCING: u8 = 2;

/// Fewest observations the test regression can be run on
pub const MIN_ADF_OBSERVATIONS: usize = 6;

// MacKinnon (1994) response surface, constant-only regression, one variable.
const TAU_MAX: f64 = 2.74;
const TAU_MIN: f64 = -18.83;
const TAU_STAR: f64 = -1.61;
const TAU_SMALL_P: [f64; 3] = [2.1659, 1.4412, 0.038269];
const TAU_LARGE_P: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

// MacKinnon (2010) finite-sample critical values: c0 + c1/T + c2/T^2 + c3/T^3
const CRIT_1: [f64; 4] = [-3.43035, -6.5393, -16.786, -79.433];
const CRIT_5: [f64; 4] = [-2.86154, -2.8903, -4.234, -40.040];
const CRIT_10: [f64; 4] = [-2.56677, -1.5384, -2.809, 0.0];

/// Number of first differences applied to a series (0, 1 or 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DifferencingOrder(u8);

impl DifferencingOrder {
    /// Validate and wrap an order
    pub fn new(order: u8) -> Result<Self> {
        if order > MAX_DIFFERENCING {
            return Err(ForecastError::InvalidParameter(format!(
                "Differencing order must be at most {}, got {}",
                MAX_DIFFERENCING, order
            )));
        }
        Ok(Self(order))
    }

    /// The order as a small integer
    pub fn value(self) -> u8 {
        self.0
    }

    /// The order as an index-friendly count
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u8> for DifferencingOrder {
    type Error = ForecastError;

    fn try_from(order: u8) -> Result<Self> {
        Self::new(order)
    }
}

impl From<DifferencingOrder> for u8 {
    fn from(order: DifferencingOrder) -> u8 {
        order.0
    }
}

impl fmt::Display for DifferencingOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Critical values of the ADF statistic
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CriticalValues {
    pub one_percent: f64,
    pub five_percent: f64,
    pub ten_percent: f64,
}

/// Outcome of an Augmented Dickey-Fuller test
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdfResult {
    /// t-statistic on the lagged level
    pub statistic: f64,
    /// MacKinnon approximate p-value
    pub p_value: f64,
    /// Number of lagged differences in the test regression
    pub used_lag: usize,
    /// Observations in the test regression
    pub nobs: usize,
    /// Critical values for this sample size
    pub critical_values: CriticalValues,
}

impl AdfResult {
    /// Whether the unit root is rejected at `significance`
    pub fn is_stationary(&self, significance: f64) -> bool {
        self.p_value <= significance
    }
}

/// Trace of the differencing policy
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DifferencingDecision {
    /// Differences applied
    pub order: DifferencingOrder,
    /// Rounded ADF p-value of each tested series; `order + 1` entries
    pub p_values: Vec<f64>,
    /// Whether the last tested series was stationary
    pub stationary: bool,
}

impl DifferencingDecision {
    /// p-value of the final (chosen) series
    pub fn final_p_value(&self) -> f64 {
        self.p_values.last().copied().unwrap_or(1.0)
    }
}

/// Run an ADF test with a constant term and AIC lag selection.
///
/// The maximum lag is `ceil(12 * (n / 100)^(1/4))`, limited to `n / 2 - 2`.
/// Every candidate lag is compared on the same sample; the winner is then
/// re-estimated on the longest sample it allows.
pub fn adf_test(values: &[f64]) -> Result<AdfResult> {
    let n = values.len();
    if n < MIN_ADF_OBSERVATIONS {
        return Err(ForecastError::InsufficientData {
            required: MIN_ADF_OBSERVATIONS,
            available: n,
        });
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ForecastError::DataError(
            "ADF test input contains non-finite values".to_string(),
        ));
    }
    if is_constant(values, 0.0) {
        return Err(ForecastError::DegenerateSeries(
            "ADF test input is constant".to_string(),
        ));
    }

    let schwert = (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as usize;
    let max_lag = schwert.min(n / 2 - 2);
    let diffs = difference(values);

    // Lag selection on the common sample
    let mut best: Option<(f64, usize)> = None;
    for lag in 0..=max_lag {
        let fit = match adf_regression(values, &diffs, lag, max_lag) {
            Ok(fit) => fit,
            Err(MathError::SingularMatrix(_)) | Err(MathError::CalculationError(_)) => continue,
            Err(err) => return Err(err.into()),
        };
        let aic = fit.aic();
        if best.map_or(true, |(best_aic, _)| aic < best_aic) {
            best = Some((aic, lag));
        }
    }

    let (_, used_lag) = best.ok_or_else(|| {
        ForecastError::DegenerateSeries(
            "ADF regression is singular for every lag length".to_string(),
        )
    })?;

    let fit = adf_regression(values, &diffs, used_lag, used_lag).map_err(|err| {
        ForecastError::DegenerateSeries(format!("ADF regression failed: {}", err))
    })?;

    let statistic = fit.t_value(1).unwrap_or(f64::NAN);
    if !statistic.is_finite() {
        return Err(ForecastError::DegenerateSeries(
            "ADF statistic is not finite".to_string(),
        ));
    }

    let p_value = mackinnon_p_value(statistic);
    let nobs = fit.nobs();
    debug!(statistic, p_value, used_lag, nobs, "ADF test");

    Ok(AdfResult {
        statistic,
        p_value,
        used_lag,
        nobs,
        critical_values: critical_values(nobs),
    })
}

/// Regress `diffs[t]` on a constant, the level `values[t]` and `lag` lagged
/// differences, for `t` in `skip..diffs.len()`.
fn adf_regression(
    values: &[f64],
    diffs: &[f64],
    lag: usize,
    skip: usize,
) -> std::result::Result<OlsFit, MathError> {
    let rows = skip..diffs.len();
    let y: Vec<f64> = diffs[rows.clone()].to_vec();

    let mut columns = Vec::with_capacity(lag + 2);
    columns.push(vec![1.0; y.len()]);
    columns.push(values[rows.clone()].to_vec());
    for j in 1..=lag {
        columns.push(rows.clone().map(|t| diffs[t - j]).collect());
    }

    ols(&y, &columns)
}

/// MacKinnon's approximate p-value for the constant-only ADF statistic
pub fn mackinnon_p_value(statistic: f64) -> f64 {
    if statistic > TAU_MAX {
        return 1.0;
    }
    if statistic < TAU_MIN {
        return 0.0;
    }

    let coefficients: &[f64] = if statistic <= TAU_STAR {
        &TAU_SMALL_P
    } else {
        &TAU_LARGE_P
    };
    let z = coefficients
        .iter()
        .rev()
        .fold(0.0, |acc, c| acc * statistic + c);

    match Normal::new(0.0, 1.0) {
        Ok(normal) => normal.cdf(z),
        Err(_) => f64::NAN,
    }
}

/// Finite-sample critical values for a regression on `nobs` observations
pub fn critical_values(nobs: usize) -> CriticalValues {
    let t = nobs.max(1) as f64;
    let eval = |c: &[f64; 4]| c[0] + c[1] / t + c[2] / t.powi(2) + c[3] / t.powi(3);
    CriticalValues {
        one_percent: eval(&CRIT_1),
        five_percent: eval(&CRIT_5),
        ten_percent: eval(&CRIT_10),
    }
}

/// ADF p-value of `values`, rounded to three decimals
pub fn test_stationarity(values: &[f64]) -> Result<f64> {
    Ok(round_to(adf_test(values)?.p_value, 3))
}

/// Number of first differences needed before the ADF test rejects a unit
/// root at the 5% level, capped at two
pub fn choose_differencing_order(values: &[f64]) -> Result<DifferencingOrder> {
    Ok(analyze_differencing(values, DEFAULT_SIGNIFICANCE, MAX_DIFFERENCING)?.order)
}

/// Differencing policy with its full trace.
///
/// Starts at `d = 0`; while the rounded p-value exceeds `significance` and
/// `d < max_order`, differences once more and re-tests. Stops at the cap even
/// if the series is still non-stationary.
pub fn analyze_differencing(
    values: &[f64],
    significance: f64,
    max_order: u8,
) -> Result<DifferencingDecision> {
    let max_order = DifferencingOrder::new(max_order)?;

    let mut current = values.to_vec();
    let mut p_value = test_stationarity(&current)?;
    let mut p_values = vec![p_value];
    let mut order = 0u8;

    while p_value > significance && order < max_order.value() {
        order += 1;
        current = difference(&current);
        p_value = test_stationarity(&current)?;
        p_values.push(p_value);
    }

    debug!(order, p_value, "chose differencing order");
    Ok(DifferencingDecision {
        order: DifferencingOrder::new(order)?,
        p_values,
        stationary: p_value <= significance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_order_bounds() {
        assert!(DifferencingOrder::new(2).is_ok());
        assert!(DifferencingOrder::new(3).is_err());
        assert_eq!(DifferencingOrder::new(1).unwrap().as_usize(), 1);
    }

    #[test]
    fn test_order_serde() {
        let order: DifferencingOrder = serde_json::from_str("1").unwrap();
        assert_eq!(order.value(), 1);
        assert!(serde_json::from_str::<DifferencingOrder>("5").is_err());
        assert_eq!(serde_json::to_string(&order).unwrap(), "1");
    }

    #[test]
    fn test_constant_input_is_degenerate() {
        let err = adf_test(&[3.5; 40]).unwrap_err();
        assert!(matches!(err, ForecastError::DegenerateSeries(_)));
    }

    #[test]
    fn test_p_value_tails() {
        assert_eq!(mackinnon_p_value(3.0), 1.0);
        assert_eq!(mackinnon_p_value(-20.0), 0.0);
    }

    #[test]
    fn test_p_value_near_five_percent_critical_value() {
        // The asymptotic 5% critical value should map to roughly p = 0.05
        let p = mackinnon_p_value(-2.8615);
        assert!((p - 0.05).abs() < 0.01, "p = {}", p);
        let p = mackinnon_p_value(-3.4304);
        assert!((p - 0.01).abs() < 0.005, "p = {}", p);
    }

    #[test]
    fn test_p_value_monotonic() {
        let stats = [-6.0, -4.0, -3.0, -2.0, -1.61, -1.0, 0.0, 1.0, 2.5];
        for pair in stats.windows(2) {
            assert!(mackinnon_p_value(pair[0]) <= mackinnon_p_value(pair[1]));
        }
    }

    #[test]
    fn test_critical_values_large_sample() {
        let cv = critical_values(100_000);
        assert_abs_diff_eq!(cv.one_percent, -3.43, epsilon = 0.01);
        assert_abs_diff_eq!(cv.five_percent, -2.86, epsilon = 0.01);
        assert_abs_diff_eq!(cv.ten_percent, -2.57, epsilon = 0.01);
    }

    #[test]
    fn test_adf_too_short() {
        let err = adf_test(&[1.0, 2.0, 1.5]).unwrap_err();
        assert!(matches!(err, ForecastError::InsufficientData { .. }));
    }
}
