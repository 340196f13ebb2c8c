// ABOUTME: Backends that carry operations to the container tool.
// ABOUTME: Either run the tool in-process or forward requests to the privileged helper.

pub mod args;
mod error;
mod local;
mod traits;

pub use error::{BridgeError, ErrorKind, classify_failure, is_service_unreachable};
pub use local::LocalBackend;
pub(crate) use traits::sealed::Sealed;
pub use traits::{ContainerOps, DnsOps, FullBackend, ImageOps, LogOps, SystemOps};

use std::time::Duration;

/// Deadline for listing calls, where a hung service must not block the caller.
pub const DEFAULT_LISTING_TIMEOUT: Duration = Duration::from_secs(5);

/// Deadline for everything else. Starting the system or pulling an image is slow.
pub const DEFAULT_ACTION_TIMEOUT: Duration = Duration::from_secs(120);

/// Per-call deadlines applied at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadlines {
    pub listing: Duration,
    pub action: Duration,
}

impl Default for Deadlines {
    fn default() -> Self {
        Self {
            listing: DEFAULT_LISTING_TIMEOUT,
            action: DEFAULT_ACTION_TIMEOUT,
        }
    }
}
