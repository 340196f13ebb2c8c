// ABOUTME: Entry point for the berth CLI application.
// ABOUTME: Parses arguments, loads config and dispatches to command handlers.

mod cli;
mod commands;

use berth::config::{self, Config};
use berth::error::Result;
use berth::output::{Output, OutputMode};
use clap::Parser;
use cli::{Cli, Commands};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbose flag when set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let output = Output::new(mode);
    let cwd = env::current_dir()?;

    if let Commands::Init { force } = cli.command {
        let path = config::init_config(&cwd, force)?;
        output.success(&format!("Created {}", path.display()));
        return Ok(());
    }

    let mut config = Config::resolve(cli.config.as_deref(), &cwd)?;
    if let Some(socket) = cli.socket {
        config.helper.socket = socket;
    }

    match cli.command {
        Commands::Helper => commands::run_helper(&config, &output).await,
        Commands::Ping => commands::ping(&config, &output).await,
        command if cli.direct => {
            commands::execute(config.local_backend(), &config, command, output).await
        }
        command => commands::execute(config.helper_client(), &config, command, output).await,
    }
}
