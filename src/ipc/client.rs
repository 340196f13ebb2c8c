// ABOUTME: Backend that forwards every operation to the helper over its socket.
// ABOUTME: Applies per-call deadlines and abandons the connection when one expires.

use super::error::{ClosedSnafu, ConnectSnafu, TransportError, UnexpectedSnafu};
use super::protocol::{Payload, Request, Response, read_frame, write_frame};
use crate::backend::{
    BridgeError, ContainerOps, Deadlines, DnsOps, ImageOps, LogOps, Sealed, SystemOps,
};
use crate::model::{Container, ContainerImage, DnsDomain, LogKind, LogQuery, SystemServiceStatus};
use crate::tool::LineStream;
use crate::types::{ContainerId, DomainName, ImageRef};
use async_trait::async_trait;
use snafu::{OptionExt, ResultExt};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::BufReader;
use tokio::net::UnixStream;
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};

type Connection = (BufReader<OwnedReadHalf>, OwnedWriteHalf);

pub struct HelperClient {
    socket: PathBuf,
    deadlines: Deadlines,
}

impl HelperClient {
    pub fn new(socket: impl Into<PathBuf>, deadlines: Deadlines) -> Self {
        Self {
            socket: socket.into(),
            deadlines,
        }
    }

    pub fn socket(&self) -> &Path {
        &self.socket
    }

    /// Helper version, proving it is reachable.
    pub async fn ping(&self) -> Result<String, BridgeError> {
        match self.call(Request::Ping).await? {
            Payload::Pong { version } => Ok(version),
            other => Err(BridgeError::InvalidOutput(format!(
                "unexpected reply to ping: {other:?}"
            ))),
        }
    }

    fn deadline(&self, request: &Request) -> Duration {
        if request.is_listing() {
            self.deadlines.listing
        } else {
            self.deadlines.action
        }
    }

    async fn connect(&self, request: &Request) -> Result<Connection, TransportError> {
        let stream = UnixStream::connect(&self.socket).await.context(ConnectSnafu {
            path: self.socket.clone(),
        })?;
        let (read, mut write) = stream.into_split();
        write_frame(&mut write, request).await?;
        Ok((BufReader::new(read), write))
    }

    async fn exchange(&self, request: &Request) -> Result<Payload, BridgeError> {
        // The write half stays alive until the response is read; closing it
        // early would look like a hangup to the helper.
        let (mut reader, _write) = self.connect(request).await?;
        let frame: Response = read_frame(&mut reader).await?.context(ClosedSnafu)?;
        match frame {
            Response::Ok { payload } => Ok(payload),
            Response::Err { error } => Err(error),
            other => Err(UnexpectedSnafu { frame: other.name() }.build().into()),
        }
    }

    async fn call(&self, request: Request) -> Result<Payload, BridgeError> {
        let deadline = self.deadline(&request);
        match tokio::time::timeout(deadline, self.exchange(&request)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(op = request.name(), ?deadline, "helper call timed out");
                Err(BridgeError::Timeout(deadline))
            }
        }
    }

    async fn open_stream(&self, request: Request) -> Result<LineStream, BridgeError> {
        let deadline = self.deadlines.action;
        let connection = tokio::time::timeout(deadline, self.connect(&request))
            .await
            .map_err(|_| BridgeError::Timeout(deadline))??;

        let stream = futures::stream::unfold(Some(connection), |state| async move {
            let (mut reader, write) = state?;
            match read_frame::<_, Response>(&mut reader).await {
                Ok(Some(Response::Line { line })) => Some((Ok(line), Some((reader, write)))),
                Ok(Some(Response::End)) => None,
                Ok(Some(Response::Err { error })) => Some((Err(error), None)),
                Ok(Some(other)) => Some((
                    Err(UnexpectedSnafu { frame: other.name() }.build().into()),
                    None,
                )),
                Ok(None) => Some((Err(ClosedSnafu.build().into()), None)),
                Err(e) => Some((Err(e.into()), None)),
            }
        });
        Ok(Box::pin(stream))
    }
}

impl Sealed for HelperClient {}

#[async_trait]
impl ContainerOps for HelperClient {
    async fn list_containers(&self) -> Result<Vec<Container>, BridgeError> {
        self.call(Request::ListContainers).await?.into_containers()
    }

    async fn start_container(&self, id: &ContainerId) -> Result<(), BridgeError> {
        self.call(Request::StartContainer { id: id.clone() })
            .await?
            .into_unit()
    }

    async fn stop_container(&self, id: &ContainerId) -> Result<(), BridgeError> {
        self.call(Request::StopContainer { id: id.clone() })
            .await?
            .into_unit()
    }

    async fn delete_container(&self, id: &ContainerId) -> Result<(), BridgeError> {
        self.call(Request::DeleteContainer { id: id.clone() })
            .await?
            .into_unit()
    }

    async fn run_container(
        &self,
        image: &ImageRef,
        name: Option<&str>,
    ) -> Result<(), BridgeError> {
        self.call(Request::RunContainer {
            image: image.clone(),
            name: name.map(str::to_string),
        })
        .await?
        .into_unit()
    }

    async fn open_terminal(&self, id: &ContainerId) -> Result<(), BridgeError> {
        self.call(Request::OpenTerminal { id: id.clone() })
            .await?
            .into_unit()
    }
}

#[async_trait]
impl ImageOps for HelperClient {
    async fn list_images(&self) -> Result<Vec<ContainerImage>, BridgeError> {
        self.call(Request::ListImages).await?.into_images()
    }

    async fn delete_image(&self, reference: &ImageRef) -> Result<(), BridgeError> {
        self.call(Request::DeleteImage {
            reference: reference.clone(),
        })
        .await?
        .into_unit()
    }
}

#[async_trait]
impl LogOps for HelperClient {
    async fn container_logs(
        &self,
        id: &ContainerId,
        lines: Option<u32>,
    ) -> Result<String, BridgeError> {
        self.call(Request::ContainerLogs {
            id: id.clone(),
            lines,
        })
        .await?
        .into_text()
    }

    async fn container_boot_logs(&self, id: &ContainerId) -> Result<String, BridgeError> {
        self.call(Request::ContainerBootLogs { id: id.clone() })
            .await?
            .into_text()
    }

    async fn system_logs(&self, window: Option<&str>) -> Result<String, BridgeError> {
        self.call(Request::SystemLogs {
            window: window.map(str::to_string),
        })
        .await?
        .into_text()
    }

    async fn follow_logs(
        &self,
        kind: &LogKind,
        query: &LogQuery,
    ) -> Result<LineStream, BridgeError> {
        self.open_stream(Request::FollowLogs {
            kind: kind.clone(),
            query: query.clone(),
        })
        .await
    }
}

#[async_trait]
impl SystemOps for HelperClient {
    async fn system_status(&self) -> Result<SystemServiceStatus, BridgeError> {
        self.call(Request::SystemStatus).await?.into_status()
    }

    async fn start_system(&self) -> Result<(), BridgeError> {
        self.call(Request::StartSystem).await?.into_unit()
    }

    async fn stop_system(&self) -> Result<(), BridgeError> {
        self.call(Request::StopSystem).await?.into_unit()
    }

    async fn restart_system(&self) -> Result<(), BridgeError> {
        self.call(Request::RestartSystem).await?.into_unit()
    }
}

#[async_trait]
impl DnsOps for HelperClient {
    async fn list_dns_domains(&self) -> Result<Vec<DnsDomain>, BridgeError> {
        self.call(Request::ListDnsDomains).await?.into_domains()
    }

    async fn create_dns_domain(&self, domain: &DomainName) -> Result<(), BridgeError> {
        self.call(Request::CreateDnsDomain {
            domain: domain.clone(),
        })
        .await?
        .into_unit()
    }

    async fn delete_dns_domain(&self, domain: &DomainName) -> Result<(), BridgeError> {
        self.call(Request::DeleteDnsDomain {
            domain: domain.clone(),
        })
        .await?
        .into_unit()
    }

    async fn set_default_dns_domain(&self, domain: &DomainName) -> Result<(), BridgeError> {
        self.call(Request::SetDefaultDnsDomain {
            domain: domain.clone(),
        })
        .await?
        .into_unit()
    }
}
