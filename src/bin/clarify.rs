//! Clarify CLI - descriptive names for generated Java tests.

use clap::Parser;

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    let code = match cli.command {
        Commands::Run(args) => cli::run_command(args).await?,
        Commands::Eval(args) => {
            cli::eval_command(args).await?;
            cli::EXIT_OK
        }
        Commands::PrintDefaultConfig => {
            cli::print_default_config().await?;
            cli::EXIT_OK
        }
        Commands::ValidateConfig(args) => cli::validate_config(args).await?,
    };

    if code != cli::EXIT_OK {
        std::process::exit(code);
    }
    Ok(())
}
