use std::fmt::{self, Write as _};

use anyhow::{Context, Result};
use price_forecast::{
    CsvPriceSource, EvaluationScore, ForecastPipeline, PipelineConfig, PredictionReport,
};
use tracing::info;

use crate::cli::{OutputFormat, PredictArgs};

/// Execute the `predict` subcommand.
pub fn run(args: PredictArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => PipelineConfig::from_toml_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    let horizon = args
        .horizon
        .map(|h| h as usize)
        .unwrap_or(config.default_horizon);

    let pipeline = ForecastPipeline::new(config).context("invalid pipeline configuration")?;
    let source = CsvPriceSource::new(&args.data_dir);

    info!(symbol = %args.symbol, horizon, dir = %args.data_dir.display(), "forecasting");
    let report = pipeline
        .predict_from_source(&source, &args.symbol, horizon)
        .with_context(|| format!("forecast for {} failed", args.symbol.to_uppercase()))?;

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        OutputFormat::Table => render_table(&report)?,
    };
    println!("{output}");
    Ok(())
}

fn render_table(report: &PredictionReport) -> Result<String, fmt::Error> {
    let info = &report.model_info;
    let mut out = String::new();

    writeln!(out, "{} ARIMA{}", report.symbol, info.order)?;
    writeln!(
        out,
        "last close {:.2}, {} smoothed points, stationary: {} (ADF p = {:.3})",
        info.last_actual_price, info.data_points_used, info.stationarity_achieved, info.adf_p_value
    )?;
    match info.rmse {
        EvaluationScore::Scored { rmse } => writeln!(out, "hold-out RMSE (scaled): {rmse:.2}")?,
        EvaluationScore::Unscored {
            required,
            available,
        } => writeln!(out, "unscored: {available} of {required} points for a hold-out")?,
    }
    writeln!(out)?;
    writeln!(out, "{:<12} {:>12} {:>12} {:>12}", "date", "predicted", "lower", "upper")?;
    for point in &report.predictions {
        writeln!(
            out,
            "{:<12} {:>12.2} {:>12.2} {:>12.2}",
            point.date.format("%Y-%m-%d"),
            point.predicted_price,
            point.lower,
            point.upper
        )?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use price_forecast::PriceSeries;

    fn sample_report() -> PredictionReport {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dates = (0..90).map(|i| start + Duration::days(i)).collect();
        let prices = (0..90)
            .map(|i| 50.0 + 0.2 * i as f64 + (i as f64 * 1.3).sin())
            .collect();
        let series = PriceSeries::from_parts(dates, prices).unwrap();
        ForecastPipeline::default().predict("abc", &series, 3).unwrap()
    }

    #[test]
    fn table_lists_every_prediction() {
        let report = sample_report();
        let table = render_table(&report).unwrap();

        assert!(table.starts_with("ABC ARIMA(5, "));
        assert!(table.contains("hold-out RMSE"));
        for point in &report.predictions {
            assert!(table.contains(&point.date.format("%Y-%m-%d").to_string()));
        }
    }
}
