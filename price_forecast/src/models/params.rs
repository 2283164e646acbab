//! Unconstrained parametrization of ARMA coefficients.
//!
//! The optimizer works on free real numbers. Each is squashed into a partial
//! autocorrelation in (-1, 1) with `tanh`, and the Durbin-Levinson recursion
//! turns the partial autocorrelations into polynomial coefficients. Any
//! parameter vector therefore maps to a stationary AR polynomial or an
//! invertible MA polynomial.

/// Largest partial autocorrelation magnitude allowed; keeps roots strictly
/// off the unit circle so the stationary covariance exists.
const MAX_PARTIAL: f64 = 0.9999;

/// Coefficients `c` such that `1 - c_1 z - ... - c_k z^k` has all roots
/// outside the unit circle.
fn stable_polynomial(free: &[f64]) -> Vec<f64> {
    let k = free.len();
    let partial: Vec<f64> = free
        .iter()
        .map(|a| a.tanh().clamp(-MAX_PARTIAL, MAX_PARTIAL))
        .collect();

    let mut coeffs: Vec<f64> = Vec::with_capacity(k);
    for (m, &r) in partial.iter().enumerate() {
        let previous = coeffs.clone();
        for j in 0..m {
            coeffs[j] = previous[j] - r * previous[m - 1 - j];
        }
        coeffs.push(r);
    }
    coeffs
}

/// AR coefficients `phi` of `y_t = phi_1 y_{t-1} + ... + e_t` (stationary)
pub(crate) fn ar_coefficients(free: &[f64]) -> Vec<f64> {
    stable_polynomial(free)
}

/// MA coefficients `theta` of `y_t = e_t + theta_1 e_{t-1} + ...` (invertible)
pub(crate) fn ma_coefficients(free: &[f64]) -> Vec<f64> {
    stable_polynomial(free).into_iter().map(|c| -c).collect()
}
