// ABOUTME: Process boundary between unprivileged callers and the helper.
// ABOUTME: JSON-lines over a Unix socket; the helper owns all tool invocations.

mod client;
mod error;
mod protocol;
mod server;

pub use client::HelperClient;
pub use error::TransportError;
pub use protocol::{Payload, Request, Response, read_frame, write_frame};
pub use server::{HelperHandle, start};

use std::path::PathBuf;

/// File name of the helper socket inside the temp directory.
pub const SOCKET_NAME: &str = "berth-helper.sock";

pub fn default_socket_path() -> PathBuf {
    std::env::temp_dir().join(SOCKET_NAME)
}
