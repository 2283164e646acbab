//! Error types for the price_forecast crate

use thiserror::Error;

/// Custom error types for the price_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Too few observations for the requested stage
    #[error("Insufficient data: need at least {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },

    /// Input whose statistics make a transform undefined (e.g. zero variance)
    #[error("Degenerate series: {0}")]
    DegenerateSeries(String),

    /// The likelihood optimisation failed or produced a non-finite result
    #[error("Model fit failure: {0}")]
    ModelFitFailure(String),

    /// The price source returned nothing usable for a symbol
    #[error("Price data unavailable for {symbol}: {reason}")]
    UpstreamDataUnavailable { symbol: String, reason: String },

    /// Differencing cap reached without a stationary series
    #[error("Series still non-stationary after {order} differences (p-value {p_value})")]
    NonStationary { order: u8, p_value: f64 },

    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error loading or validating configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error from numeric building blocks
    #[error("Math error: {0}")]
    MathError(#[from] trade_math::MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV parsing
    #[error("CSV error: {0}")]
    CsvError(String),
}

impl ForecastError {
    /// Whether a caller may reasonably retry the same request.
    ///
    /// The pipeline itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ForecastError::ModelFitFailure(_) | ForecastError::UpstreamDataUnavailable { .. }
        )
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::CsvError(err.to_string())
    }
}

impl From<toml::de::Error> for ForecastError {
    fn from(err: toml::de::Error) -> Self {
        ForecastError::ConfigError(err.to_string())
    }
}
