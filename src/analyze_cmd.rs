use std::fmt::{self, Write as _};

use anyhow::{Context, Result};
use price_forecast::analysis::{analyze_from_source, AnalysisReport};
use price_forecast::CsvPriceSource;
use tracing::info;

use crate::cli::{AnalyzeArgs, OutputFormat};

/// Execute the `analyze` subcommand.
pub fn run(args: AnalyzeArgs) -> Result<()> {
    let source = CsvPriceSource::new(&args.data_dir);

    info!(symbol = %args.symbol, dir = %args.data_dir.display(), "analysing");
    let report = analyze_from_source(&source, &args.symbol)
        .with_context(|| format!("analysis of {} failed", args.symbol.to_uppercase()))?;

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        OutputFormat::Table => render_table(&report)?,
    };
    println!("{output}");
    Ok(())
}

fn cell(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => "n/a".to_string(),
    }
}

fn render_table(report: &AnalysisReport) -> Result<String, fmt::Error> {
    let summary = &report.summary;
    let ind = &report.technical_indicators;
    let mut out = String::new();

    writeln!(
        out,
        "{} {:.2} ({:+.2}, {:+.2}%), {:?}",
        report.symbol,
        summary.current_price,
        summary.price_change,
        summary.percent_change,
        summary.trend
    )?;
    writeln!(
        out,
        "range {:.2} - {:.2}, mean {:.2}, volatility {:.4}",
        summary.period_low, summary.period_high, summary.average_price, summary.volatility
    )?;
    writeln!(out)?;

    let ma = &ind.moving_averages;
    writeln!(
        out,
        "MA 10/20/50   {} / {} / {}",
        cell(ma.ma_10, 2),
        cell(ma.ma_20, 2),
        cell(ma.ma_50, 2)
    )?;
    writeln!(out, "RSI 14        {}", cell(ind.rsi, 2))?;
    writeln!(
        out,
        "MACD          {} signal {} histogram {}",
        cell(ind.macd.macd, 4),
        cell(ind.macd.signal, 4),
        cell(ind.macd.histogram, 4)
    )?;
    let bands = &ind.bollinger_bands;
    writeln!(
        out,
        "Bollinger     {} / {} / {}",
        cell(bands.lower, 2),
        cell(bands.middle, 2),
        cell(bands.upper, 2)
    )?;
    Ok(out)
}
