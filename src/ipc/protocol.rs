// ABOUTME: Newline-delimited JSON frames exchanged with the helper.
// ABOUTME: One request per connection, answered by one response or a stream of log lines.

use super::error::{DecodeSnafu, EncodeSnafu, ReceiveSnafu, SendSnafu, TransportError};
use crate::backend::BridgeError;
use crate::model::{Container, ContainerImage, DnsDomain, LogKind, LogQuery, SystemServiceStatus};
use crate::types::{ContainerId, DomainName, ImageRef};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Ping,
    ListContainers,
    ListImages,
    StartContainer { id: ContainerId },
    StopContainer { id: ContainerId },
    DeleteContainer { id: ContainerId },
    DeleteImage { reference: ImageRef },
    RunContainer { image: ImageRef, name: Option<String> },
    ContainerLogs { id: ContainerId, lines: Option<u32> },
    ContainerBootLogs { id: ContainerId },
    SystemLogs { window: Option<String> },
    FollowLogs { kind: LogKind, query: LogQuery },
    SystemStatus,
    StartSystem,
    StopSystem,
    RestartSystem,
    ListDnsDomains,
    CreateDnsDomain { domain: DomainName },
    DeleteDnsDomain { domain: DomainName },
    SetDefaultDnsDomain { domain: DomainName },
    OpenTerminal { id: ContainerId },
}

impl Request {
    /// Listing calls get the short deadline.
    pub fn is_listing(&self) -> bool {
        matches!(
            self,
            Request::Ping
                | Request::ListContainers
                | Request::ListImages
                | Request::SystemStatus
                | Request::ListDnsDomains
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Request::Ping => "ping",
            Request::ListContainers => "list_containers",
            Request::ListImages => "list_images",
            Request::StartContainer { .. } => "start_container",
            Request::StopContainer { .. } => "stop_container",
            Request::DeleteContainer { .. } => "delete_container",
            Request::DeleteImage { .. } => "delete_image",
            Request::RunContainer { .. } => "run_container",
            Request::ContainerLogs { .. } => "container_logs",
            Request::ContainerBootLogs { .. } => "container_boot_logs",
            Request::SystemLogs { .. } => "system_logs",
            Request::FollowLogs { .. } => "follow_logs",
            Request::SystemStatus => "system_status",
            Request::StartSystem => "start_system",
            Request::StopSystem => "stop_system",
            Request::RestartSystem => "restart_system",
            Request::ListDnsDomains => "list_dns_domains",
            Request::CreateDnsDomain { .. } => "create_dns_domain",
            Request::DeleteDnsDomain { .. } => "delete_dns_domain",
            Request::SetDefaultDnsDomain { .. } => "set_default_dns_domain",
            Request::OpenTerminal { .. } => "open_terminal",
        }
    }
}

/// Successful result of a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Payload {
    Unit,
    Pong { version: String },
    Text(String),
    Containers(Vec<Container>),
    Images(Vec<ContainerImage>),
    Domains(Vec<DnsDomain>),
    Status(SystemServiceStatus),
}

impl Payload {
    fn kind(&self) -> &'static str {
        match self {
            Payload::Unit => "unit",
            Payload::Pong { .. } => "pong",
            Payload::Text(_) => "text",
            Payload::Containers(_) => "containers",
            Payload::Images(_) => "images",
            Payload::Domains(_) => "domains",
            Payload::Status(_) => "status",
        }
    }

    fn mismatch(self, wanted: &str) -> BridgeError {
        BridgeError::InvalidOutput(format!(
            "helper returned {} where {wanted} was expected",
            self.kind()
        ))
    }

    pub fn into_unit(self) -> Result<(), BridgeError> {
        match self {
            Payload::Unit => Ok(()),
            other => Err(other.mismatch("unit")),
        }
    }

    pub fn into_text(self) -> Result<String, BridgeError> {
        match self {
            Payload::Text(text) => Ok(text),
            other => Err(other.mismatch("text")),
        }
    }

    pub fn into_containers(self) -> Result<Vec<Container>, BridgeError> {
        match self {
            Payload::Containers(c) => Ok(c),
            other => Err(other.mismatch("containers")),
        }
    }

    pub fn into_images(self) -> Result<Vec<ContainerImage>, BridgeError> {
        match self {
            Payload::Images(i) => Ok(i),
            other => Err(other.mismatch("images")),
        }
    }

    pub fn into_domains(self) -> Result<Vec<DnsDomain>, BridgeError> {
        match self {
            Payload::Domains(d) => Ok(d),
            other => Err(other.mismatch("domains")),
        }
    }

    pub fn into_status(self) -> Result<SystemServiceStatus, BridgeError> {
        match self {
            Payload::Status(s) => Ok(s),
            other => Err(other.mismatch("status")),
        }
    }
}

/// A frame sent by the helper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "frame", rename_all = "snake_case")]
pub enum Response {
    Ok { payload: Payload },
    Err { error: BridgeError },
    /// One line of a followed log.
    Line { line: String },
    /// A followed log ended normally.
    End,
}

impl Response {
    pub fn name(&self) -> &'static str {
        match self {
            Response::Ok { .. } => "ok",
            Response::Err { .. } => "err",
            Response::Line { .. } => "line",
            Response::End => "end",
        }
    }
}

impl From<Result<Payload, BridgeError>> for Response {
    fn from(result: Result<Payload, BridgeError>) -> Self {
        match result {
            Ok(payload) => Response::Ok { payload },
            Err(error) => Response::Err { error },
        }
    }
}

/// Write one frame followed by a newline.
pub async fn write_frame<W, T>(writer: &mut W, frame: &T) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let mut bytes = serde_json::to_vec(frame).context(EncodeSnafu)?;
    bytes.push(b'\n');
    writer.write_all(&bytes).await.context(SendSnafu)?;
    writer.flush().await.context(SendSnafu)
}

/// Read one frame. `None` means the peer closed the connection.
pub async fn read_frame<R, T>(reader: &mut R) -> Result<Option<T>, TransportError>
where
    R: AsyncBufRead + Unpin,
    T: DeserializeOwned,
{
    let mut line = String::new();
    let read = reader.read_line(&mut line).await.context(ReceiveSnafu)?;
    if read == 0 {
        return Ok(None);
    }
    serde_json::from_str(&line).map(Some).context(DecodeSnafu)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_are_tagged_by_operation() {
        let json = serde_json::to_value(Request::StartContainer {
            id: ContainerId::new("abc"),
        })
        .expect("serialize should succeed");
        assert_eq!(json, serde_json::json!({"op": "start_container", "id": "abc"}));
    }

    #[test]
    fn listing_requests_use_short_deadline() {
        assert!(Request::ListContainers.is_listing());
        assert!(!Request::StartSystem.is_listing());
    }

    #[test]
    fn error_frames_carry_structured_kind() {
        let frame = Response::Err {
            error: BridgeError::CommandFailed("no such container".into()),
        };
        let json = serde_json::to_value(&frame).expect("serialize should succeed");
        assert_eq!(json["frame"], "err");
        assert_eq!(json["error"]["kind"], "command_failed");
    }

    #[test]
    fn invalid_domain_in_request_is_rejected() {
        let result: Result<Request, _> =
            serde_json::from_str(r#"{"op":"create_dns_domain","domain":"bad domain"}"#);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn frames_round_trip_over_a_pipe() {
        let (mut client, server) = tokio::io::duplex(1024);
        let mut reader = tokio::io::BufReader::new(server);

        write_frame(&mut client, &Request::ListImages)
            .await
            .expect("write should succeed");
        let frame: Option<Request> = read_frame(&mut reader).await.expect("read should succeed");
        assert_eq!(frame, Some(Request::ListImages));
    }

    #[test]
    fn payload_mismatch_is_invalid_output() {
        let err = Payload::Unit.into_containers().expect_err("should mismatch");
        assert_eq!(err.kind(), crate::backend::ErrorKind::InvalidOutput);
    }
}
