// ABOUTME: Command handlers for the berth CLI.
// ABOUTME: Each handler drives the synchronizer and reports through Output.

mod containers;
mod dns;
mod helper;
mod system;

pub use helper::{ping, run_helper};

use crate::cli::Commands;
use berth::backend::FullBackend;
use berth::config::Config;
use berth::error::{Error, Result};
use berth::model::Container;
use berth::output::Output;
use berth::sync::Synchronizer;
use berth::tool::LineStream;
use futures::StreamExt;

/// Run a container, image, log, system or DNS command against `backend`.
pub async fn execute<B: FullBackend>(
    backend: B,
    config: &Config,
    command: Commands,
    mut output: Output,
) -> Result<()> {
    let sync = Synchronizer::new(backend).with_settle_delay(config.system.settle_delay);

    if config.system.auto_start && !matches!(command, Commands::System(_)) {
        let before = sync.ensure_system_started().await?;
        tracing::debug!(%before, "system checked before command");
    }

    match command {
        Commands::Ps => containers::list(&sync, &output).await,
        Commands::Images => containers::images(&sync, &output).await,
        Commands::Start { id } => containers::start(&sync, &id, &output).await,
        Commands::Stop { id } => containers::stop(&sync, &id, &output).await,
        Commands::Rm { id } => containers::remove(&sync, &id, &output).await,
        Commands::Rmi { reference } => containers::remove_image(&sync, &reference, &output).await,
        Commands::Run { image, name } => {
            containers::run(&sync, &image, name.as_deref(), &output).await
        }
        Commands::Logs(args) => containers::logs(&sync, args, &output).await,
        Commands::Terminal { id } => containers::terminal(&sync, &id, &output).await,
        Commands::System(cmd) => system::execute(&sync, cmd, &mut output).await,
        Commands::Dns(cmd) => dns::execute(&sync, cmd, &output).await,
        Commands::Init { .. } | Commands::Helper | Commands::Ping => Err(Error::InvalidArgument(
            "command does not use a container backend".into(),
        )),
    }
}

/// Find a container by full id, id prefix or hostname, from a fresh listing.
async fn resolve_container<B: FullBackend>(sync: &Synchronizer<B>, query: &str) -> Result<Container> {
    sync.refresh_containers().await?;
    let snapshot = sync.snapshot();

    if let Some(exact) = snapshot
        .containers
        .iter()
        .find(|c| c.id.as_str() == query || c.hostname == query)
    {
        return Ok(exact.clone());
    }

    let mut prefixed = snapshot
        .containers
        .iter()
        .filter(|c| c.id.as_str().starts_with(query));
    match (prefixed.next(), prefixed.next()) {
        (Some(found), None) => Ok(found.clone()),
        (Some(_), Some(_)) => Err(Error::InvalidArgument(format!(
            "'{query}' matches more than one container"
        ))),
        (None, _) => Err(Error::InvalidArgument(format!(
            "no container matches '{query}'"
        ))),
    }
}

/// Print streamed log lines until the stream ends or ctrl-c.
async fn follow(mut lines: LineStream, output: &Output) -> Result<()> {
    let interrupted = tokio::signal::ctrl_c();
    tokio::pin!(interrupted);

    loop {
        tokio::select! {
            item = lines.next() => match item {
                Some(Ok(line)) => output.log_line(&line),
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
            _ = &mut interrupted => return Ok(()),
        }
    }
}
