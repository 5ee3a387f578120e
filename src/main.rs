//! cytology-knn - Main Entry Point
//!
//! Runs the feature-subset KNN ensemble experiment from the command line.

use clap::Parser;
use cytology_knn::cli::{cmd_config, cmd_info, cmd_run, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cytology_knn=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { data, config, seed, repetitions, output } => {
            cmd_run(&data, config.as_deref(), seed, repetitions, output.as_deref())?;
        }
        Commands::Info { data, config } => {
            cmd_info(&data, config.as_deref())?;
        }
        Commands::Config { output } => {
            cmd_config(output.as_deref())?;
        }
    }

    Ok(())
}
