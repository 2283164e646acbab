mod analyze_cmd;
mod cli;
mod logging;
mod predict_cmd;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Predict(args) => predict_cmd::run(args),
        Command::Analyze(args) => analyze_cmd::run(args),
        Command::ModelInfo => {
            let description = price_forecast::models::model_description();
            println!("{}", serde_json::to_string_pretty(&description)?);
            Ok(())
        }
    }
}
