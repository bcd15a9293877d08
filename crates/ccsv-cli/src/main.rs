#![doc = include_str!("../README.md")]

mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use ccsv_engine::{Property, Question};

#[tokio::main]
async fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Strong {
            first,
            second,
            check,
        } => {
            let property = Property::strong_bisimulation(first, second);
            commands::verify::run_check_command(property, check).await?;
        }
        Commands::Weak {
            first,
            second,
            check,
        } => {
            let property = Property::weak_bisimulation(first, second);
            commands::verify::run_check_command(property, check).await?;
        }
        Commands::Hml {
            process,
            formula,
            strict,
            check,
        } => {
            let property = Property::new(Question::Hml {
                process,
                formula,
                use_strict_semantics: strict,
            });
            commands::verify::run_check_command(property, check).await?;
        }
    }

    Ok(())
}
