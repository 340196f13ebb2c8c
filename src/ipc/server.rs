// ABOUTME: The privileged helper's socket server.
// ABOUTME: Accepts one request per connection and runs it against a local backend.

use super::error::{BindSnafu, InUseSnafu, TransportError};
use super::protocol::{Payload, Request, Response, read_frame, write_frame};
use crate::backend::{BridgeError, FullBackend};
use crate::model::{LogKind, LogQuery};
use futures::StreamExt;
use parking_lot::Mutex;
use snafu::ResultExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::io::{AsyncReadExt, BufReader};
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Notify;
use tokio::task::AbortHandle;

const ACCEPT_POLL: Duration = Duration::from_millis(100);
const STOP_GRACE: Duration = Duration::from_secs(2);

/// Handle to a running helper. Dropping it stops the helper.
pub struct HelperHandle {
    socket: PathBuf,
    shutdown: Arc<AtomicBool>,
    shutdown_complete: Arc<Notify>,
    connections: Arc<Mutex<Vec<AbortHandle>>>,
}

impl HelperHandle {
    pub fn socket(&self) -> &Path {
        &self.socket
    }

    /// Stop accepting, abandon in-flight requests and remove the socket.
    pub async fn stop(self) {
        self.shutdown.store(true, Ordering::SeqCst);
        tokio::select! {
            _ = self.shutdown_complete.notified() => {}
            _ = tokio::time::sleep(STOP_GRACE) => {}
        }
        // Drop does the rest.
    }
}

impl Drop for HelperHandle {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        for conn in self.connections.lock().drain(..) {
            conn.abort();
        }
        let _ = std::fs::remove_file(&self.socket);
    }
}

/// Bind `socket` and serve requests against `backend` until the handle is stopped.
pub fn start<B>(socket: impl Into<PathBuf>, backend: B) -> Result<HelperHandle, TransportError>
where
    B: FullBackend + 'static,
{
    let socket = socket.into();

    if socket.exists() {
        if std::os::unix::net::UnixStream::connect(&socket).is_ok() {
            return InUseSnafu { path: socket }.fail();
        }
        tracing::debug!(path = %socket.display(), "removing stale helper socket");
        let _ = std::fs::remove_file(&socket);
    }
    if let Some(parent) = socket.parent() {
        std::fs::create_dir_all(parent).ok();
    }

    let listener = UnixListener::bind(&socket).context(BindSnafu {
        path: socket.clone(),
    })?;
    tracing::info!(path = %socket.display(), "helper listening");

    let handle = HelperHandle {
        socket,
        shutdown: Arc::new(AtomicBool::new(false)),
        shutdown_complete: Arc::new(Notify::new()),
        connections: Arc::new(Mutex::new(Vec::new())),
    };

    tokio::spawn(accept_loop(
        listener,
        Arc::new(backend),
        handle.shutdown.clone(),
        handle.shutdown_complete.clone(),
        handle.connections.clone(),
    ));

    Ok(handle)
}

async fn accept_loop<B>(
    listener: UnixListener,
    backend: Arc<B>,
    shutdown: Arc<AtomicBool>,
    shutdown_complete: Arc<Notify>,
    connections: Arc<Mutex<Vec<AbortHandle>>>,
) where
    B: FullBackend + 'static,
{
    loop {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }

        let accepted = tokio::select! {
            result = listener.accept() => result,
            _ = tokio::time::sleep(ACCEPT_POLL) => continue,
        };

        match accepted {
            Ok((stream, _addr)) => {
                let backend = Arc::clone(&backend);
                let task = tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, backend).await {
                        tracing::debug!("helper connection error: {e}");
                    }
                });
                let mut conns = connections.lock();
                conns.retain(|c| !c.is_finished());
                conns.push(task.abort_handle());
            }
            Err(e) => {
                if !shutdown.load(Ordering::SeqCst) {
                    tracing::warn!("accept error on helper socket: {e}");
                }
                break;
            }
        }
    }

    shutdown_complete.notify_one();
}

async fn handle_connection<B: FullBackend>(
    stream: UnixStream,
    backend: Arc<B>,
) -> Result<(), TransportError> {
    let (read, mut write) = stream.into_split();
    let mut reader = BufReader::new(read);

    let request: Request = match read_frame(&mut reader).await {
        Ok(Some(request)) => request,
        Ok(None) => return Ok(()),
        Err(e) => {
            let error = BridgeError::InvalidOutput(format!("malformed request: {e}"));
            return write_frame(&mut write, &Response::Err { error }).await;
        }
    };
    tracing::debug!(op = request.name(), "helper request");

    if let Request::FollowLogs { kind, query } = request {
        return follow(&*backend, &kind, &query, &mut reader, &mut write).await;
    }

    // The client dropping its end cancels the work, killing any tool process.
    let response = tokio::select! {
        result = dispatch(&*backend, request) => Response::from(result),
        () = hangup(&mut reader) => {
            tracing::debug!("client hung up; abandoning request");
            return Ok(());
        }
    };
    write_frame(&mut write, &response).await
}

/// Resolves once the client closes its side of the connection.
async fn hangup(reader: &mut BufReader<OwnedReadHalf>) {
    let mut buf = [0u8; 256];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }
    }
}

async fn follow<B: FullBackend>(
    backend: &B,
    kind: &LogKind,
    query: &LogQuery,
    reader: &mut BufReader<OwnedReadHalf>,
    write: &mut OwnedWriteHalf,
) -> Result<(), TransportError> {
    let mut lines = match backend.follow_logs(kind, query).await {
        Ok(lines) => lines,
        Err(error) => return write_frame(write, &Response::Err { error }).await,
    };

    loop {
        let frame = tokio::select! {
            item = lines.next() => match item {
                Some(Ok(line)) => Response::Line { line },
                Some(Err(error)) => Response::Err { error },
                None => Response::End,
            },
            () = hangup(reader) => {
                tracing::debug!("client stopped following logs");
                return Ok(());
            }
        };
        let done = !matches!(frame, Response::Line { .. });
        write_frame(write, &frame).await?;
        if done {
            return Ok(());
        }
    }
}

async fn dispatch<B: FullBackend>(backend: &B, request: Request) -> Result<Payload, BridgeError> {
    match request {
        Request::Ping => Ok(Payload::Pong {
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
        Request::ListContainers => backend.list_containers().await.map(Payload::Containers),
        Request::ListImages => backend.list_images().await.map(Payload::Images),
        Request::StartContainer { id } => backend.start_container(&id).await.map(unit),
        Request::StopContainer { id } => backend.stop_container(&id).await.map(unit),
        Request::DeleteContainer { id } => backend.delete_container(&id).await.map(unit),
        Request::DeleteImage { reference } => backend.delete_image(&reference).await.map(unit),
        Request::RunContainer { image, name } => backend
            .run_container(&image, name.as_deref())
            .await
            .map(unit),
        Request::ContainerLogs { id, lines } => backend
            .container_logs(&id, lines)
            .await
            .map(Payload::Text),
        Request::ContainerBootLogs { id } => backend
            .container_boot_logs(&id)
            .await
            .map(Payload::Text),
        Request::SystemLogs { window } => backend
            .system_logs(window.as_deref())
            .await
            .map(Payload::Text),
        Request::FollowLogs { .. } => Err(BridgeError::CommandFailed(
            "log following must use a streaming connection".into(),
        )),
        Request::SystemStatus => backend.system_status().await.map(Payload::Status),
        Request::StartSystem => backend.start_system().await.map(unit),
        Request::StopSystem => backend.stop_system().await.map(unit),
        Request::RestartSystem => backend.restart_system().await.map(unit),
        Request::ListDnsDomains => backend.list_dns_domains().await.map(Payload::Domains),
        Request::CreateDnsDomain { domain } => backend.create_dns_domain(&domain).await.map(unit),
        Request::DeleteDnsDomain { domain } => backend.delete_dns_domain(&domain).await.map(unit),
        Request::SetDefaultDnsDomain { domain } => {
            backend.set_default_dns_domain(&domain).await.map(unit)
        }
        Request::OpenTerminal { id } => backend.open_terminal(&id).await.map(unit),
    }
}

fn unit(_: ()) -> Payload {
    Payload::Unit
}
