//! Kolosal Eval - Main Entry Point
//!
//! Evaluate classifiers from the command line.

use clap::Parser;
use kolosal_eval::cli::{cmd_evaluate, cmd_info, cmd_scan, Cli, Commands, EvaluateArgs};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kolosal_eval=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Evaluate(args)) => {
            cmd_evaluate(&args)?;
        }
        Some(Commands::Scan { source, model, fractions, seed }) => {
            cmd_scan(&source, model, fractions.as_deref(), seed)?;
        }
        Some(Commands::Info { source }) => {
            cmd_info(&source)?;
        }
        None => {
            // Default: evaluate AdaBoost on Iris
            cmd_evaluate(&EvaluateArgs::default())?;
        }
    }

    Ok(())
}
