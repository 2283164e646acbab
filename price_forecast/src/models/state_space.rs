//! ARMA(p, q) in state-space form.
//!
//! ```text
//! x[t+1] = T x[t] + R e[t]
//! y[t]   = x[t][0]
//! ```
//!
//! `T` is the companion matrix of the AR polynomial, `R = [1, theta_1, ...]`
//! and the state dimension is `max(p, q + 1)`. Variances are expressed in
//! units of the innovation variance, which the likelihood concentrates out.

use crate::error::{ForecastError, Result};
use ndarray::{Array1, Array2, Axis};

/// Doubling steps allowed when solving for the stationary covariance
const MAX_DOUBLINGS: usize = 64;

#[derive(Clone, Debug)]
pub(crate) struct StateSpace {
    dim: usize,
    transition: Array2<f64>,
    rrt: Array2<f64>,
}

impl StateSpace {
    pub(crate) fn new(ar: &[f64], ma: &[f64]) -> Self {
        let dim = ar.len().max(ma.len() + 1);

        let mut transition = Array2::zeros((dim, dim));
        for (i, &phi) in ar.iter().enumerate() {
            transition[[i, 0]] = phi;
        }
        for i in 0..dim - 1 {
            transition[[i, i + 1]] = 1.0;
        }

        let mut r = Array1::zeros(dim);
        r[0] = 1.0;
        for (j, &theta) in ma.iter().enumerate() {
            r[j + 1] = theta;
        }

        Self {
            dim,
            transition,
            rrt: outer(&r, &r),
        }
    }

    pub(crate) fn dim(&self) -> usize {
        self.dim
    }

    pub(crate) fn transition(&self) -> &Array2<f64> {
        &self.transition
    }

    pub(crate) fn rrt(&self) -> &Array2<f64> {
        &self.rrt
    }

    /// Unconditional state covariance `P = T P T' + R R'`.
    ///
    /// Solved by doubling: after `k` steps the sum covers `2^k` terms of
    /// `sum_j T^j R R' T'^j`.
    pub(crate) fn stationary_covariance(&self) -> Result<Array2<f64>> {
        let mut p = self.rrt.clone();
        let mut a = self.transition.clone();

        for _ in 0..MAX_DOUBLINGS {
            let increment = a.dot(&p).dot(&a.t());
            p = &p + &increment;
            a = a.dot(&a);

            let remaining = a.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
            if !remaining.is_finite() {
                break;
            }
            if remaining < 1e-14 {
                return Ok(p);
            }
        }

        if p.iter().all(|v| v.is_finite()) && a.iter().all(|v| v.abs() < 1e-6) {
            return Ok(p);
        }

        Err(ForecastError::ModelFitFailure(
            "AR polynomial is too close to a unit root for a stationary start".to_string(),
        ))
    }
}

pub(crate) fn outer(a: &Array1<f64>, b: &Array1<f64>) -> Array2<f64> {
    let col = a.view().insert_axis(Axis(1));
    let row = b.view().insert_axis(Axis(0));
    col.dot(&row)
}
