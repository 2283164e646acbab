//! Volatility indicator implementations
//!
//! Contains Bollinger Bands built on a simple moving average and the sample
//! standard deviation of the same window.

use crate::moving_averages::SimpleMovingAverage;
use crate::statistics::sample_std_dev;
use crate::{MathError, Result};
use std::collections::VecDeque;

/// Bollinger Bands implementation
#[derive(Debug, Clone)]
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
    prices: VecDeque<f64>,
    sma: SimpleMovingAverage,
}

impl BollingerBands {
    /// Create a new Bollinger Bands with the specified parameters
    pub fn new(period: usize, std_dev_multiplier: f64) -> Result<Self> {
        if period < 2 {
            return Err(MathError::InvalidInput(
                "Period must be at least 2".to_string(),
            ));
        }
        if !(std_dev_multiplier > 0.0) {
            return Err(MathError::InvalidInput(
                "Standard deviation multiplier must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            period,
            std_dev_multiplier,
            prices: VecDeque::with_capacity(period + 1),
            sma: SimpleMovingAverage::new(period)?,
        })
    }

    /// Update the Bollinger Bands with a new price value
    pub fn update(&mut self, price: f64) -> Result<()> {
        self.sma.update(price)?;
        self.prices.push_back(price);
        if self.prices.len() > self.period {
            self.prices.pop_front();
        }
        Ok(())
    }

    /// Get the current middle band (SMA)
    pub fn middle_band(&self) -> Result<f64> {
        self.sma.value()
    }

    /// Get the current upper band (SMA + multiplier * std_dev)
    pub fn upper_band(&self) -> Result<f64> {
        Ok(self.middle_band()? + self.std_dev()? * self.std_dev_multiplier)
    }

    /// Get the current lower band (SMA - multiplier * std_dev)
    pub fn lower_band(&self) -> Result<f64> {
        Ok(self.middle_band()? - self.std_dev()? * self.std_dev_multiplier)
    }

    fn std_dev(&self) -> Result<f64> {
        if self.prices.len() < self.period {
            return Err(MathError::InsufficientData(format!(
                "Not enough data to calculate standard deviation. Need {} values, have {}.",
                self.period,
                self.prices.len()
            )));
        }
        let window: Vec<f64> = self.prices.iter().copied().collect();
        sample_std_dev(&window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bollinger_bands() {
        let mut bands = BollingerBands::new(5, 2.0).unwrap();
        for price in [1.0, 2.0, 3.0, 4.0] {
            bands.update(price).unwrap();
        }
        assert!(bands.upper_band().is_err());

        bands.update(5.0).unwrap();
        let spread = 2.0 * 2.5_f64.sqrt();
        assert!((bands.middle_band().unwrap() - 3.0).abs() < 1e-12);
        assert!((bands.upper_band().unwrap() - (3.0 + spread)).abs() < 1e-12);
        assert!((bands.lower_band().unwrap() - (3.0 - spread)).abs() < 1e-12);

        // Window slides to [2, 3, 4, 5, 6]
        bands.update(6.0).unwrap();
        assert!((bands.middle_band().unwrap() - 4.0).abs() < 1e-12);
        assert!((bands.upper_band().unwrap() - (4.0 + spread)).abs() < 1e-12);
    }

    #[test]
    fn test_bollinger_rejects_bad_parameters() {
        assert!(BollingerBands::new(1, 2.0).is_err());
        assert!(BollingerBands::new(20, 0.0).is_err());
    }
}
