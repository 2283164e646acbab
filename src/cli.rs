use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// ARIMA forecasts of daily closing prices.
#[derive(Parser)]
#[command(
    name = "quote_forecast",
    version,
    about = "ARIMA forecasts of daily closing prices"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Forecast a symbol's closing price from its CSV history.
    Predict(PredictArgs),
    /// Summarize a symbol's history with technical indicators.
    Analyze(AnalyzeArgs),
    /// Describe the forecasting model.
    ModelInfo,
}

/// Report rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

/// Arguments for the `predict` subcommand.
#[derive(clap::Args)]
pub struct PredictArgs {
    /// Directory holding `<SYMBOL>.csv` files.
    #[arg(short, long)]
    pub data_dir: PathBuf,

    /// Ticker symbol (case-insensitive).
    #[arg(short, long)]
    pub symbol: String,

    /// Days to forecast; defaults to the configured horizon.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=365))]
    pub horizon: Option<u32>,

    /// Path to a TOML pipeline configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

/// Arguments for the `analyze` subcommand.
#[derive(clap::Args)]
pub struct AnalyzeArgs {
    /// Directory holding `<SYMBOL>.csv` files.
    #[arg(short, long)]
    pub data_dir: PathBuf,

    /// Ticker symbol (case-insensitive).
    #[arg(short, long)]
    pub symbol: String,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}
