// ABOUTME: Container, image and container log commands.
// ABOUTME: Resolves container arguments before dispatching.

use super::{follow, resolve_container};
use crate::cli::LogsArgs;
use berth::backend::FullBackend;
use berth::error::{Error, Result};
use berth::model::{LogQuery, LogSource};
use berth::output::Output;
use berth::sync::Synchronizer;
use berth::types::ImageRef;

fn image_ref(raw: &str) -> Result<ImageRef> {
    ImageRef::parse(raw).map_err(|e| Error::InvalidArgument(e.to_string()))
}

pub async fn list<B: FullBackend>(sync: &Synchronizer<B>, output: &Output) -> Result<()> {
    sync.refresh_containers().await?;
    output.containers(&sync.snapshot().containers);
    Ok(())
}

pub async fn images<B: FullBackend>(sync: &Synchronizer<B>, output: &Output) -> Result<()> {
    sync.refresh_images().await?;
    output.images(&sync.snapshot().images);
    Ok(())
}

pub async fn start<B: FullBackend>(sync: &Synchronizer<B>, id: &str, output: &Output) -> Result<()> {
    let container = resolve_container(sync, id).await?;
    sync.start_container(&container.id).await?;
    output.success(&format!("Started {}", container.display_name()));
    Ok(())
}

pub async fn stop<B: FullBackend>(sync: &Synchronizer<B>, id: &str, output: &Output) -> Result<()> {
    let container = resolve_container(sync, id).await?;
    sync.stop_container(&container.id).await?;
    output.success(&format!("Stopped {}", container.display_name()));
    Ok(())
}

pub async fn remove<B: FullBackend>(sync: &Synchronizer<B>, id: &str, output: &Output) -> Result<()> {
    let container = resolve_container(sync, id).await?;
    sync.delete_container(&container.id).await?;
    output.success(&format!("Deleted {}", container.display_name()));
    Ok(())
}

pub async fn remove_image<B: FullBackend>(
    sync: &Synchronizer<B>,
    reference: &str,
    output: &Output,
) -> Result<()> {
    let reference = image_ref(reference)?;
    sync.delete_image(&reference).await?;
    output.success(&format!("Deleted image {reference}"));
    Ok(())
}

pub async fn run<B: FullBackend>(
    sync: &Synchronizer<B>,
    image: &str,
    name: Option<&str>,
    output: &Output,
) -> Result<()> {
    let image = image_ref(image)?;
    output.progress(&format!("Starting container from {image}..."));
    sync.create_and_run_container(&image, name).await?;
    output.success(&format!("Running {}", name.unwrap_or(image.short_name())));
    Ok(())
}

pub async fn logs<B: FullBackend>(
    sync: &Synchronizer<B>,
    args: LogsArgs,
    output: &Output,
) -> Result<()> {
    let container = resolve_container(sync, &args.id).await?;
    let source = if args.boot {
        LogSource::container_boot(&container)
    } else {
        LogSource::container(&container)
    };
    let query = LogQuery {
        lines: args.lines,
        window: None,
    };

    if args.follow {
        tracing::debug!(source = %source.id, "following logs");
        return follow(sync.follow_logs(&source, &query).await?, output).await;
    }

    output.log_text(&sync.fetch_logs(&source, &query).await?);
    Ok(())
}

pub async fn terminal<B: FullBackend>(
    sync: &Synchronizer<B>,
    id: &str,
    output: &Output,
) -> Result<()> {
    let container = resolve_container(sync, id).await?;
    if !container.is_running() {
        return Err(Error::InvalidArgument(format!(
            "{} is not running",
            container.display_name()
        )));
    }
    sync.open_terminal(&container.id).await?;
    output.success(&format!("Opened terminal for {}", container.display_name()));
    Ok(())
}
