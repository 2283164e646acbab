use chrono::{Duration, NaiveDate};
use price_forecast::analysis::analyze;
use price_forecast::evaluation::score;
use price_forecast::models::fit_and_forecast;
use price_forecast::preprocess::{scale, smooth};
use price_forecast::stationarity::analyze_differencing;
use price_forecast::{ForecastPipeline, PriceSeries};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Price Forecast: Basic Forecasting Example");
    println!("=========================================\n");

    let series = create_sample_daily_data()?;
    println!(
        "Sample data created: {} daily points ending {}\n",
        series.len(),
        series.last_date().map(|d| d.to_string()).unwrap_or_default()
    );

    // Stage by stage
    let smoothed = smooth(&series)?;
    let decision = analyze_differencing(&smoothed.values(), 0.05, 2)?;
    println!(
        "Differencing order: {} (ADF p-values {:?})",
        decision.order, decision.p_values
    );

    let (scaled, scaler) = scale(&smoothed)?;
    println!("Hold-out score: {:?}", score(&scaled, decision.order)?);

    let forecast = fit_and_forecast(&scaled, decision.order, 5)?;
    let prices = scaler.inverse_transform(forecast.values());
    println!("\nNext 5 days (scaled fit, price units):");
    if let Some(dates) = forecast.dates() {
        for (date, price) in dates.iter().zip(&prices) {
            println!("  {}: {:.2}", date, price);
        }
    }

    // The same through the pipeline
    let report = ForecastPipeline::default().predict("DEMO", &series, 10)?;
    println!("\nPipeline report:");
    for point in &report.predictions {
        println!(
            "  {}: {:.2}  [{:.2}, {:.2}]",
            point.date, point.predicted_price, point.lower, point.upper
        );
    }
    println!("\n{}", serde_json::to_string_pretty(&report.model_info)?);

    // Descriptive view of the same history
    let analysis = analyze("DEMO", &series)?;
    println!("\nSummary: {}", serde_json::to_string_pretty(&analysis.summary)?);
    println!(
        "Indicators: {}",
        serde_json::to_string_pretty(&analysis.technical_indicators)?
    );

    Ok(())
}

/// Create sample daily data with a trend, a weekly cycle and some wobble
fn create_sample_daily_data() -> price_forecast::Result<PriceSeries> {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap_or_default();
    let mut dates = Vec::with_capacity(180);
    let mut prices = Vec::with_capacity(180);

    for day in 0..180 {
        let t = day as f64;
        let trend = 100.0 + 0.3 * t;
        let weekly = 2.0 * (t * std::f64::consts::TAU / 7.0).sin();
        let wobble = 1.5 * (t * 0.37).sin() * (t * 0.11).cos();
        dates.push(start + Duration::days(day));
        prices.push(trend + weekly + wobble);
    }

    PriceSeries::from_parts(dates, prices)
}
