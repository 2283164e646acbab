//! Moving average calculations
//!
//! Contains the streaming averages:
//! - Simple Moving Average (SMA), also behind the batch [`rolling_mean`]
//! - Exponential Moving Average (EMA), span-weighted with bias adjustment

use crate::{MathError, Result};
use std::collections::VecDeque;

/// Simple Moving Average (SMA) implementation
#[derive(Debug, Clone)]
pub struct SimpleMovingAverage {
    period: usize,
    values: VecDeque<f64>,
    sum: f64,
}

impl SimpleMovingAverage {
    /// Create a new Simple Moving Average with the specified period
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(MathError::InvalidInput(
                "Period must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            period,
            values: VecDeque::with_capacity(period),
            sum: 0.0,
        })
    }

    /// Update the SMA with a new value
    pub fn update(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(MathError::InvalidInput(format!(
                "Cannot average non-finite value {}",
                value
            )));
        }

        self.values.push_back(value);
        self.sum += value;

        // Remove oldest value if we have more than period values
        if self.values.len() > self.period {
            if let Some(old_value) = self.values.pop_front() {
                self.sum -= old_value;
            }
        }

        Ok(())
    }

    /// Whether a full window of values has been seen
    pub fn is_ready(&self) -> bool {
        self.values.len() >= self.period
    }

    /// Get the current SMA value
    pub fn value(&self) -> Result<f64> {
        if !self.is_ready() {
            return Err(MathError::InsufficientData(format!(
                "Not enough data for SMA calculation. Need {} values, have {}.",
                self.period,
                self.values.len()
            )));
        }

        Ok(self.sum / self.period as f64)
    }
}

/// Exponential Moving Average (EMA) with `alpha = 2 / (span + 1)`.
///
/// Each value is the weighted mean of everything seen so far with weights
/// `(1 - alpha)^age`, normalised by the total weight. The first update is
/// therefore its own average and there is no warm-up period.
#[derive(Debug, Clone)]
pub struct ExponentialMovingAverage {
    decay: f64,
    weighted_sum: f64,
    total_weight: f64,
}

impl ExponentialMovingAverage {
    /// Create a new EMA with the specified span
    pub fn new(span: usize) -> Result<Self> {
        if span == 0 {
            return Err(MathError::InvalidInput(
                "Span must be greater than zero".to_string(),
            ));
        }

        let alpha = 2.0 / (span as f64 + 1.0);
        Ok(Self {
            decay: 1.0 - alpha,
            weighted_sum: 0.0,
            total_weight: 0.0,
        })
    }

    /// Update the EMA with a new value
    pub fn update(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(MathError::InvalidInput(format!(
                "Cannot average non-finite value {}",
                value
            )));
        }

        self.weighted_sum = value + self.decay * self.weighted_sum;
        self.total_weight = 1.0 + self.decay * self.total_weight;
        Ok(())
    }

    /// Get the current EMA value
    pub fn value(&self) -> Result<f64> {
        if self.total_weight == 0.0 {
            return Err(MathError::InsufficientData(
                "EMA has not seen any values".to_string(),
            ));
        }
        Ok(self.weighted_sum / self.total_weight)
    }
}

/// Trailing rolling mean over `values`.
///
/// Output index `i` is the mean of `values[i..i + window]`, so the result is
/// `values.len() - window + 1` long. The leading `window - 1` positions, which
/// have no complete window, are dropped rather than padded.
pub fn rolling_mean(values: &[f64], window: usize) -> Result<Vec<f64>> {
    let mut sma = SimpleMovingAverage::new(window)?;
    if values.len() < window {
        return Err(MathError::InsufficientData(format!(
            "Rolling mean needs at least {} values, have {}",
            window,
            values.len()
        )));
    }

    let mut out = Vec::with_capacity(values.len() + 1 - window);
    for &value in values {
        sma.update(value)?;
        if sma.is_ready() {
            out.push(sma.value()?);
        }
    }

    Ok(out)
}
