//! Churnrisk: Churn Prediction CLI Tool
//!
//! Trains a classifier on first use, then prompts for customer attributes
//! and reports the churn risk.

use anyhow::Result;
use clap::Parser;

use churnrisk::cli::{run_interactive, run_predict, run_training, Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = cli.paths();
    paths.initialize()?;

    match &cli.command {
        Some(Commands::Train) => run_training(&cli, &paths).map(|_| ()),
        Some(Commands::Predict { values }) => run_predict(&cli, &paths, values).map(|_| ()),
        None => run_interactive(&cli, &paths),
    }
}
