//! Nelder-Mead search over the unconstrained ARMA parameters.
//!
//! Minimizes the negative concentrated log-likelihood with `argmin`.

use super::kalman;
use super::params::{ar_coefficients, ma_coefficients};
use super::state_space::StateSpace;
use crate::error::{ForecastError, Result};
use argmin::core::{CostFunction, Executor, State};
use argmin::solver::neldermead::NelderMead;
use tracing::debug;

/// Edge length of the initial simplex around the origin
const SIMPLEX_STEP: f64 = 0.5;

/// Coefficients at the likelihood optimum
#[derive(Clone, Debug)]
pub(crate) struct Estimate {
    pub ar: Vec<f64>,
    pub ma: Vec<f64>,
    pub iterations: u64,
}

struct NegLogLikelihood<'a> {
    data: &'a [f64],
    p: usize,
}

impl CostFunction for NegLogLikelihood<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, free: &Self::Param) -> std::result::Result<Self::Output, argmin::core::Error> {
        let (alpha, beta) = free.split_at(self.p);
        let ss = StateSpace::new(&ar_coefficients(alpha), &ma_coefficients(beta));

        match kalman::concentrated_log_likelihood(&ss, self.data) {
            Ok(loglik) if loglik.is_finite() => Ok(-loglik),
            _ => Ok(f64::MAX),
        }
    }
}

/// Maximum-likelihood ARMA(p, q) coefficients of zero-mean `data`
pub(crate) fn estimate(
    data: &[f64],
    p: usize,
    q: usize,
    max_iterations: u64,
    tolerance: f64,
) -> Result<Estimate> {
    let dim = p + q;
    if dim == 0 {
        return Ok(Estimate {
            ar: Vec::new(),
            ma: Vec::new(),
            iterations: 0,
        });
    }

    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(dim + 1);
    simplex.push(vec![0.0; dim]);
    for i in 0..dim {
        let mut vertex = vec![0.0; dim];
        vertex[i] = SIMPLEX_STEP;
        simplex.push(vertex);
    }

    let cost = NegLogLikelihood { data, p };
    let solver = NelderMead::new(simplex)
        .with_sd_tolerance(tolerance)
        .map_err(|e| ForecastError::ModelFitFailure(format!("invalid optimizer setup: {}", e)))?;

    let result = Executor::new(cost, solver)
        .configure(|state| state.max_iters(max_iterations))
        .run()
        .map_err(|e| ForecastError::ModelFitFailure(format!("optimizer failed: {}", e)))?;

    let state = result.state();
    let iterations = state.get_iter();
    if iterations >= max_iterations {
        return Err(ForecastError::ModelFitFailure(format!(
            "likelihood did not converge within {} iterations",
            max_iterations
        )));
    }
    if !state.get_best_cost().is_finite() || state.get_best_cost() == f64::MAX {
        return Err(ForecastError::ModelFitFailure(
            "likelihood is not finite anywhere on the search path".to_string(),
        ));
    }

    let best = state.get_best_param().ok_or_else(|| {
        ForecastError::ModelFitFailure("optimizer returned no parameters".to_string())
    })?;
    let (alpha, beta) = best.split_at(p);
    let (ar, ma) = (ar_coefficients(alpha), ma_coefficients(beta));

    debug!(iterations, p, q, "likelihood maximized");
    Ok(Estimate { ar, ma, iterations })
}
