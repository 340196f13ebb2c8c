// ABOUTME: Transport-level failures on the helper socket.
// ABOUTME: Surface to callers as ConnectionLost bridge errors.

use crate::backend::BridgeError;
use snafu::Snafu;
use std::path::PathBuf;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TransportError {
    #[snafu(display("helper socket {} is unavailable: {source}", path.display()))]
    Connect {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to bind helper socket {}: {source}", path.display()))]
    Bind {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("another helper is already listening on {}", path.display()))]
    InUse { path: PathBuf },

    #[snafu(display("failed to send frame: {source}"))]
    Send { source: std::io::Error },

    #[snafu(display("failed to read frame: {source}"))]
    Receive { source: std::io::Error },

    #[snafu(display("connection closed before a response arrived"))]
    Closed,

    #[snafu(display("unencodable frame: {source}"))]
    Encode { source: serde_json::Error },

    #[snafu(display("undecodable frame: {source}"))]
    Decode { source: serde_json::Error },

    #[snafu(display("unexpected {frame} frame"))]
    Unexpected { frame: &'static str },
}

impl From<TransportError> for BridgeError {
    fn from(err: TransportError) -> Self {
        BridgeError::ConnectionLost(err.to_string())
    }
}
