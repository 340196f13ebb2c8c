// ABOUTME: Container records and the observed-versus-pending status wrapper.
// ABOUTME: Pending values are optimistic guesses awaiting the next refresh.

use crate::types::{ContainerId, ImageRef};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerStatus {
    Running,
    Stopped,
    Exited,
    /// Only ever produced optimistically, never parsed from the tool.
    Starting,
    /// Only ever produced optimistically, never parsed from the tool.
    Stopping,
}

impl ContainerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ContainerStatus::Running => "running",
            ContainerStatus::Stopped => "stopped",
            ContainerStatus::Exited => "exited",
            ContainerStatus::Starting => "starting",
            ContainerStatus::Stopping => "stopping",
        }
    }
}

impl fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value either confirmed by the tool or assumed after a mutating call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "observed", content = "value", rename_all = "snake_case")]
pub enum Observed<T> {
    Confirmed(T),
    Pending(T),
}

impl<T> Observed<T> {
    pub fn current(&self) -> &T {
        match self {
            Observed::Confirmed(v) | Observed::Pending(v) => v,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Observed::Pending(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            Observed::Confirmed(v) | Observed::Pending(v) => v,
        }
    }
}

/// One network attachment of a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerNetwork {
    pub network: String,
    pub hostname: Option<String>,
    pub address: String,
    pub gateway: String,
}

/// A container as reported by the tool's listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub id: ContainerId,
    pub name: String,
    pub hostname: String,
    /// Short image name, e.g. `nginx`.
    pub image: String,
    pub image_reference: ImageRef,
    pub image_digest: Option<String>,
    pub status: Observed<ContainerStatus>,
    pub os: String,
    pub arch: String,
    pub cpus: u32,
    pub memory_in_bytes: u64,
    pub networks: Vec<ContainerNetwork>,
    pub rosetta: bool,
}

impl Container {
    pub fn status(&self) -> ContainerStatus {
        *self.status.current()
    }

    pub fn is_running(&self) -> bool {
        self.status() == ContainerStatus::Running
    }

    /// Hostname, or the abbreviated id when the hostname merely repeats it.
    pub fn display_name(&self) -> &str {
        if self.hostname.is_empty() || self.hostname == self.id.as_str() {
            self.id.short()
        } else {
            &self.hostname
        }
    }

    /// Address on the first attached network, if any.
    pub fn primary_address(&self) -> Option<&str> {
        self.networks.first().map(|n| n.address.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container(id: &str, hostname: &str) -> Container {
        Container {
            id: ContainerId::new(id),
            name: id.to_string(),
            hostname: hostname.to_string(),
            image: "alpine".into(),
            image_reference: ImageRef::parse("alpine").expect("valid reference"),
            image_digest: None,
            status: Observed::Confirmed(ContainerStatus::Running),
            os: "linux".into(),
            arch: "arm64".into(),
            cpus: 2,
            memory_in_bytes: 1 << 30,
            networks: vec![],
            rosetta: false,
        }
    }

    #[test]
    fn display_name_prefers_hostname() {
        assert_eq!(container("3f9a8c1e2b4d5f60", "web").display_name(), "web");
    }

    #[test]
    fn display_name_abbreviates_id_when_hostname_repeats_it() {
        let c = container("3f9a8c1e2b4d5f60", "3f9a8c1e2b4d5f60");
        assert_eq!(c.display_name(), "3f9a8c1e2b4d");
    }

    #[test]
    fn pending_status_reports_current_value() {
        let status = Observed::Pending(ContainerStatus::Starting);
        assert!(status.is_pending());
        assert_eq!(*status.current(), ContainerStatus::Starting);
    }

    #[test]
    fn primary_address_is_none_without_networks() {
        assert_eq!(container("abc", "web").primary_address(), None);
    }
}
