// ABOUTME: Entry point for the stolos CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use std::env;
use stolos::config::{self, Config};
use stolos::error::Result;
use stolos::output::{Output, OutputMode};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };

    if let Err(e) = run(cli, mode).await {
        Output::new(mode).error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, mode: OutputMode) -> Result<()> {
    let output = Output::new(mode);

    match cli.command {
        Commands::Init { prefix, force } => {
            let cwd = env::current_dir()?;
            config::init_config(&cwd, prefix.as_deref(), force)?;
            output.success("Created stolos.yml");
            Ok(())
        }
        Commands::Fleet {
            managers,
            workers,
            force,
        } => {
            let cwd = env::current_dir()?;
            let config = Config::discover(&cwd)?;
            commands::fleet(config, managers, workers, force, output).await
        }
        Commands::Maintain {
            managers,
            workers,
            force,
        } => {
            let cwd = env::current_dir()?;
            let config = Config::discover(&cwd)?;
            commands::maintain(config, managers, workers, force, output).await
        }
        Commands::Members => {
            let cwd = env::current_dir()?;
            let config = Config::discover(&cwd)?;
            commands::members(config).await
        }
    }
}
