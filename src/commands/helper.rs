// ABOUTME: The helper command and helper reachability check.
// ABOUTME: Serves the socket until interrupted.

use berth::config::Config;
use berth::error::Result;
use berth::ipc;
use berth::output::Output;

/// Serve helper requests until interrupted.
pub async fn run_helper(config: &Config, output: &Output) -> Result<()> {
    let backend = config.local_backend();
    tracing::info!(tool = %backend.executor().tool(), "helper using container tool");

    let handle = ipc::start(&config.helper.socket, backend)?;
    output.success(&format!(
        "Helper listening on {}",
        handle.socket().display()
    ));

    tokio::signal::ctrl_c().await?;
    output.progress("Shutting down helper");
    handle.stop().await;
    Ok(())
}

pub async fn ping(config: &Config, output: &Output) -> Result<()> {
    let client = config.helper_client();
    let version = client.ping().await?;
    output.success(&format!(
        "Helper {version} reachable at {}",
        client.socket().display()
    ));
    Ok(())
}
