//! Oscillator indicator implementations
//!
//! Contains implementations of:
//! - Relative Strength Index (RSI) over simple averages of gains and losses
//! - Moving Average Convergence Divergence (MACD)

use crate::moving_averages::{ExponentialMovingAverage, SimpleMovingAverage};
use crate::{MathError, Result};

/// Relative Strength Index (RSI) implementation.
///
/// Average gain and average loss are plain means over the last `period`
/// price changes, so the first value needs `period + 1` prices.
#[derive(Debug, Clone)]
pub struct RelativeStrengthIndex {
    previous_price: Option<f64>,
    gains: SimpleMovingAverage,
    losses: SimpleMovingAverage,
}

impl RelativeStrengthIndex {
    /// Create a new RSI with the specified period
    pub fn new(period: usize) -> Result<Self> {
        Ok(Self {
            previous_price: None,
            gains: SimpleMovingAverage::new(period)?,
            losses: SimpleMovingAverage::new(period)?,
        })
    }

    /// Update the RSI with a new price value
    pub fn update(&mut self, price: f64) -> Result<()> {
        if !price.is_finite() {
            return Err(MathError::InvalidInput(format!(
                "Cannot use non-finite price {}",
                price
            )));
        }

        if let Some(prev_price) = self.previous_price {
            let change = price - prev_price;
            self.gains.update(change.max(0.0))?;
            self.losses.update((-change).max(0.0))?;
        }

        self.previous_price = Some(price);
        Ok(())
    }

    /// Get the current RSI value (0-100)
    pub fn value(&self) -> Result<f64> {
        let avg_gain = self.gains.value()?;
        let avg_loss = self.losses.value()?;

        if avg_loss == 0.0 {
            if avg_gain == 0.0 {
                return Err(MathError::CalculationError(
                    "RSI is undefined when the price did not move".to_string(),
                ));
            }
            return Ok(100.0);
        }

        let rs = avg_gain / avg_loss;
        Ok(100.0 - (100.0 / (1.0 + rs)))
    }
}

/// Moving Average Convergence Divergence (MACD) implementation
#[derive(Debug, Clone)]
pub struct Macd {
    fast_ema: ExponentialMovingAverage,
    slow_ema: ExponentialMovingAverage,
    signal_ema: ExponentialMovingAverage,
}

impl Macd {
    /// Create a new MACD with the specified spans
    pub fn new(fast_span: usize, slow_span: usize, signal_span: usize) -> Result<Self> {
        if fast_span >= slow_span {
            return Err(MathError::InvalidInput(
                "Fast span must be smaller than slow span".to_string(),
            ));
        }

        Ok(Self {
            fast_ema: ExponentialMovingAverage::new(fast_span)?,
            slow_ema: ExponentialMovingAverage::new(slow_span)?,
            signal_ema: ExponentialMovingAverage::new(signal_span)?,
        })
    }

    /// Update the MACD with a new price value
    pub fn update(&mut self, price: f64) -> Result<()> {
        self.fast_ema.update(price)?;
        self.slow_ema.update(price)?;

        // The signal line averages every MACD value, starting with the first
        let line = self.macd_value()?;
        self.signal_ema.update(line)
    }

    /// Get the current MACD line value (fast EMA - slow EMA)
    pub fn macd_value(&self) -> Result<f64> {
        Ok(self.fast_ema.value()? - self.slow_ema.value()?)
    }

    /// Get the current signal line value (EMA of MACD)
    pub fn signal_value(&self) -> Result<f64> {
        self.signal_ema.value()
    }

    /// Get the current histogram value (MACD line - signal line)
    pub fn histogram(&self) -> Result<f64> {
        Ok(self.macd_value()? - self.signal_value()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_calculation() {
        let mut rsi = RelativeStrengthIndex::new(3).unwrap();

        rsi.update(10.0).unwrap();
        rsi.update(11.0).unwrap();
        rsi.update(10.5).unwrap();
        // Only two changes so far
        assert!(rsi.value().is_err());

        // Gains 1.0, 0.0, 1.0 and losses 0.0, 0.5, 0.0 give RS = 4
        rsi.update(11.5).unwrap();
        assert!((rsi.value().unwrap() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_only_gains() {
        let mut rsi = RelativeStrengthIndex::new(2).unwrap();
        for price in [1.0, 2.0, 3.0] {
            rsi.update(price).unwrap();
        }
        assert_eq!(rsi.value().unwrap(), 100.0);
    }

    #[test]
    fn test_rsi_flat_prices_undefined() {
        let mut rsi = RelativeStrengthIndex::new(2).unwrap();
        for _ in 0..4 {
            rsi.update(5.0).unwrap();
        }
        assert!(matches!(rsi.value(), Err(MathError::CalculationError(_))));
    }

    #[test]
    fn test_macd_calculation() {
        let mut macd = Macd::new(1, 3, 2).unwrap();

        macd.update(1.0).unwrap();
        assert_eq!(macd.macd_value().unwrap(), 0.0);

        // Fast EMA follows the price (2.0); slow EMA is 2.5 / 1.5
        macd.update(2.0).unwrap();
        let line = 2.0 - 2.5 / 1.5;
        assert!((macd.macd_value().unwrap() - line).abs() < 1e-12);

        // Signal with alpha = 2/3 over [0, line]
        let signal = line / (1.0 + 1.0 / 3.0);
        assert!((macd.signal_value().unwrap() - signal).abs() < 1e-12);
        assert!((macd.histogram().unwrap() - (line - signal)).abs() < 1e-12);
    }

    #[test]
    fn test_macd_rejects_bad_spans() {
        assert!(Macd::new(26, 12, 9).is_err());
        assert!(Macd::new(12, 26, 0).is_err());
    }
}
