//! Kalman filter for the exact ARMA likelihood.
//!
//! Prediction-error decomposition on the state-space form in
//! [`super::state_space`], started from the stationary covariance. The
//! innovation variance is concentrated out, so the filter runs with
//! `sigma2 = 1` and rescales at the end.

use super::state_space::{outer, StateSpace};
use crate::error::{ForecastError, Result};
use ndarray::{Array1, Array2};
use std::f64::consts::PI;

/// Everything a full pass produces
#[derive(Clone, Debug)]
pub(crate) struct FilterOutput {
    pub sigma2: f64,
    pub log_likelihood: f64,
    /// One-step prediction errors `y[t] - E[y[t] | y[..t]]`
    pub residuals: Vec<f64>,
    /// Predicted state for the first step after the sample
    pub next_state: Array1<f64>,
}

struct Pass {
    ssq: f64,
    sum_log_f: f64,
    residuals: Vec<f64>,
    state: Array1<f64>,
}

fn run(ss: &StateSpace, data: &[f64], keep_residuals: bool) -> Result<Pass> {
    let t = ss.transition();
    let mut x: Array1<f64> = Array1::zeros(ss.dim());
    let mut p: Array2<f64> = ss.stationary_covariance()?;

    let mut ssq = 0.0;
    let mut sum_log_f = 0.0;
    let mut residuals = Vec::with_capacity(if keep_residuals { data.len() } else { 0 });

    for &y in data {
        let f = p[[0, 0]];
        if !(f > 0.0) || !f.is_finite() {
            return Err(ForecastError::ModelFitFailure(format!(
                "prediction variance {} is not positive",
                f
            )));
        }

        let v = y - x[0];
        ssq += v * v / f;
        sum_log_f += f.ln();
        if keep_residuals {
            residuals.push(v);
        }

        let gain = t.dot(&p.column(0)) / f;
        x = t.dot(&x) + &gain * v;
        p = t.dot(&p).dot(&t.t()) + ss.rrt() - outer(&gain, &gain) * f;
    }

    Ok(Pass {
        ssq,
        sum_log_f,
        residuals,
        state: x,
    })
}

fn concentrated(n: f64, ssq: f64, sum_log_f: f64) -> (f64, f64) {
    let sigma2 = ssq / n;
    let loglik = -0.5 * n * ((2.0 * PI).ln() + sigma2.ln() + 1.0) - 0.5 * sum_log_f;
    (sigma2, loglik)
}

/// Concentrated log-likelihood only; the optimizer's inner loop
pub(crate) fn concentrated_log_likelihood(ss: &StateSpace, data: &[f64]) -> Result<f64> {
    let pass = run(ss, data, false)?;
    Ok(concentrated(data.len() as f64, pass.ssq, pass.sum_log_f).1)
}

pub(crate) fn filter(ss: &StateSpace, data: &[f64]) -> Result<FilterOutput> {
    if data.is_empty() {
        return Err(ForecastError::InsufficientData {
            required: 1,
            available: 0,
        });
    }

    let pass = run(ss, data, true)?;
    let (sigma2, log_likelihood) = concentrated(data.len() as f64, pass.ssq, pass.sum_log_f);
    if !(sigma2 > 0.0) || !log_likelihood.is_finite() {
        return Err(ForecastError::ModelFitFailure(
            "likelihood is not finite at the estimated parameters".to_string(),
        ));
    }

    Ok(FilterOutput {
        sigma2,
        log_likelihood,
        residuals: pass.residuals,
        next_state: pass.state,
    })
}
