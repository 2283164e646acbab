//! # Trade Math
//!
//! Numeric building blocks for price-series forecasting and analysis.
//! This crate provides the rolling mean used for smoothing, descriptive
//! statistics and differencing, the least squares solver behind the
//! unit-root test, and the streaming indicators used to describe a price
//! history (EMA, RSI, MACD, Bollinger Bands).

use thiserror::Error;

pub mod moving_averages;
pub mod oscillators;
pub mod regression;
pub mod statistics;
pub mod volatility;

pub use moving_averages::{rolling_mean, ExponentialMovingAverage, SimpleMovingAverage};
pub use oscillators::{Macd, RelativeStrengthIndex};
pub use regression::{ols, OlsFit};
pub use volatility::BollingerBands;

/// Errors that can occur in numeric calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),

    #[error("Singular matrix: {0}")]
    SingularMatrix(String),
}

/// Result type for numeric operations
pub type Result<T> = std::result::Result<T, MathError>;
