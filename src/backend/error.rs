// ABOUTME: The bridge error taxonomy and the stderr classifier.
// ABOUTME: Every failure crossing the tool or helper boundary lands in one of five kinds.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Substrings in the tool's stderr that mean its background service is gone.
const SERVICE_UNREACHABLE_MARKERS: [&str; 3] =
    ["xpc connection", "connection invalid", "interrupted"];

/// Failure of a bridge operation.
///
/// Serializable so the helper can return it to clients verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum BridgeError {
    #[error("container tool not found: {0}")]
    ToolNotFound(String),

    #[error("command failed: {0}")]
    CommandFailed(String),

    #[error("connection lost: {0}")]
    ConnectionLost(String),

    #[error("operation timed out after {}", seconds(.0))]
    Timeout(Duration),

    #[error("invalid output: {0}")]
    InvalidOutput(String),
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The container tool could not be found or executed.
    ToolNotFound,
    /// The tool ran and reported failure.
    CommandFailed,
    /// The helper or the tool's background service is unreachable.
    ConnectionLost,
    /// The operation exceeded its deadline.
    Timeout,
    /// The tool's output could not be decoded.
    InvalidOutput,
}

impl BridgeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BridgeError::ToolNotFound(_) => ErrorKind::ToolNotFound,
            BridgeError::CommandFailed(_) => ErrorKind::CommandFailed,
            BridgeError::ConnectionLost(_) => ErrorKind::ConnectionLost,
            BridgeError::Timeout(_) => ErrorKind::Timeout,
            BridgeError::InvalidOutput(_) => ErrorKind::InvalidOutput,
        }
    }

    pub fn is_connection_lost(&self) -> bool {
        self.kind() == ErrorKind::ConnectionLost
    }
}

/// Whether a failure message says the container system service is unreachable.
pub fn is_service_unreachable(message: &str) -> bool {
    let lowered = message.to_lowercase();
    SERVICE_UNREACHABLE_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// Classify a failed tool invocation from its trimmed stderr.
pub fn classify_failure(stderr: &str) -> BridgeError {
    let message = stderr.trim().to_string();
    if is_service_unreachable(&message) {
        BridgeError::ConnectionLost(message)
    } else {
        BridgeError::CommandFailed(message)
    }
}

fn seconds(d: &Duration) -> String {
    format!("{:.1}s", d.as_secs_f64())
}
