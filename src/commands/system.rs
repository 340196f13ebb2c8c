// ABOUTME: Container system service commands.
// ABOUTME: Service control and system log output.

use super::follow;
use crate::cli::SystemCommand;
use berth::backend::FullBackend;
use berth::error::Result;
use berth::model::{LogQuery, LogSource, SystemInfo};
use berth::output::Output;
use berth::sync::Synchronizer;

pub async fn execute<B: FullBackend>(
    sync: &Synchronizer<B>,
    command: SystemCommand,
    output: &mut Output,
) -> Result<()> {
    match command {
        SystemCommand::Status => {
            // DNS failures still leave a status worth showing.
            let refreshed = sync.refresh_system_info().await;
            let info = sync
                .snapshot()
                .system_info
                .unwrap_or_else(SystemInfo::stopped);
            output.system(&info);
            refreshed?;
        }
        SystemCommand::Start => {
            output.start_timer();
            output.progress("Starting container system...");
            sync.start_system().await?;
            output.success("Container system started");
        }
        SystemCommand::Stop => {
            output.start_timer();
            output.progress("Stopping container system...");
            sync.stop_system().await?;
            output.success("Container system stopped");
        }
        SystemCommand::Restart => {
            output.start_timer();
            output.progress("Restarting container system...");
            sync.restart_system().await?;
            output.success("Container system restarted");
        }
        SystemCommand::Logs { last, follow: true } => {
            let query = LogQuery {
                lines: None,
                window: last,
            };
            let lines = sync.follow_logs(&LogSource::system(), &query).await?;
            follow(lines, output).await?;
        }
        SystemCommand::Logs { last, follow: false } => {
            let text = sync.get_system_logs(last.as_deref()).await?;
            output.log_text(&text);
        }
    }
    Ok(())
}
