use price_forecast::error::ForecastError;
use price_forecast::PipelineConfig;
use std::io;

#[test]
fn test_error_conversion() {
    // Test IO error conversion
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let forecast_error = ForecastError::from(io_error);
    assert!(matches!(forecast_error, ForecastError::IoError(_)));

    // Test math error conversion
    let math_error = trade_math::MathError::InvalidInput("empty".to_string());
    let forecast_error = ForecastError::from(math_error);
    assert!(matches!(forecast_error, ForecastError::MathError(_)));

    // Test TOML error conversion
    let err = PipelineConfig::from_toml_str("ar_order = \"five\"").unwrap_err();
    assert!(matches!(err, ForecastError::ConfigError(_)));
}

#[test]
fn test_error_display() {
    let error = ForecastError::InsufficientData {
        required: 60,
        available: 12,
    };
    assert_eq!(
        error.to_string(),
        "Insufficient data: need at least 60 points, have 12"
    );

    let error = ForecastError::UpstreamDataUnavailable {
        symbol: "AAPL".to_string(),
        reason: "timeout".to_string(),
    };
    assert_eq!(error.to_string(), "Price data unavailable for AAPL: timeout");

    let error = ForecastError::NonStationary {
        order: 2,
        p_value: 0.31,
    };
    assert!(error.to_string().contains("after 2 differences"));
}

#[test]
fn test_retryable_classification() {
    assert!(ForecastError::ModelFitFailure("did not converge".to_string()).is_retryable());
    assert!(ForecastError::UpstreamDataUnavailable {
        symbol: "X".to_string(),
        reason: "down".to_string()
    }
    .is_retryable());

    assert!(!ForecastError::DegenerateSeries("constant".to_string()).is_retryable());
    assert!(!ForecastError::InsufficientData {
        required: 8,
        available: 3
    }
    .is_retryable());
    assert!(!ForecastError::InvalidParameter("horizon".to_string()).is_retryable());
}

#[test]
fn test_error_is_send_sync() {
    fn assert_send_sync<T: Send + Sync + 'static>() {}
    assert_send_sync::<ForecastError>();
}
