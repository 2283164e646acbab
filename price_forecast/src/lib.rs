//! # Price Forecast
//!
//! A Rust library for forecasting daily closing prices with a
//! stationarity-corrected ARIMA model.
//!
//! ## Features
//!
//! - Date-indexed price series with validated construction
//! - 7-day trailing rolling-mean smoothing and standard scaling
//! - Augmented Dickey-Fuller test and automatic differencing order (0-2)
//! - ARIMA(5, d, 1) fitted by exact maximum likelihood, with forecast bounds
//! - Hold-out RMSE evaluation on the last 30 points
//! - Pluggable price sources (CSV directory, in-memory)
//! - Descriptive analysis: moving averages, RSI, MACD, Bollinger Bands and
//!   summary statistics
//!
//! ## Quick Start
//!
//! ```no_run
//! use price_forecast::pipeline::ForecastPipeline;
//! use price_forecast::source::CsvPriceSource;
//!
//! # fn main() -> price_forecast::Result<()> {
//! let source = CsvPriceSource::new("data");
//! let pipeline = ForecastPipeline::default();
//!
//! let report = pipeline.predict_from_source(&source, "AAPL", 30)?;
//! for point in &report.predictions {
//!     println!("{} {:.2} [{:.2}, {:.2}]", point.date, point.predicted_price, point.lower, point.upper);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The stages can also be driven one at a time:
//!
//! ```no_run
//! use price_forecast::preprocess::{scale, smooth};
//! use price_forecast::stationarity::choose_differencing_order;
//! use price_forecast::evaluation::evaluate;
//! use price_forecast::models::fit_and_forecast;
//! # use price_forecast::data::PriceSeries;
//!
//! # fn run(series: &PriceSeries) -> price_forecast::Result<()> {
//! let smoothed = smooth(series)?;
//! let d = choose_differencing_order(&smoothed.values())?;
//! let (scaled, scaler) = scale(&smoothed)?;
//! let rmse = evaluate(&scaled, d)?;
//! let forecast = fit_and_forecast(&scaled, d, 30)?;
//! let prices = scaler.inverse_transform(forecast.values());
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod evaluation;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod preprocess;
pub mod source;
pub mod stationarity;
pub mod utils;

// Re-export commonly used types
pub use crate::analysis::{AnalysisReport, PriceSummary, TechnicalIndicators, Trend};
pub use crate::config::PipelineConfig;
pub use crate::data::{PricePoint, PriceSeries, ScaledSeries, SmoothedSeries};
pub use crate::error::{ForecastError, Result};
pub use crate::evaluation::EvaluationScore;
pub use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
pub use crate::pipeline::{ForecastPipeline, ForecastPoint, ModelInfo, PredictionReport};
pub use crate::preprocess::Scaler;
pub use crate::source::{CsvPriceSource, InMemorySource, PriceSource};
pub use crate::stationarity::{DifferencingDecision, DifferencingOrder};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
