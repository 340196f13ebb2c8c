// ABOUTME: Container system service state and local DNS domains.
// ABOUTME: Statuses carry an Observed wrapper for optimistic transitions.

use super::Observed;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemServiceStatus {
    Running,
    Stopped,
    Starting,
    Error,
}

impl fmt::Display for SystemServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SystemServiceStatus::Running => "running",
            SystemServiceStatus::Stopped => "stopped",
            SystemServiceStatus::Starting => "starting",
            SystemServiceStatus::Error => "error",
        })
    }
}

/// A local DNS domain served by the container system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsDomain {
    pub domain: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub service_status: Observed<SystemServiceStatus>,
    pub dns_settings: Vec<DnsDomain>,
    /// Never populated by the tool today.
    pub kernel_info: Option<String>,
}

impl SystemInfo {
    pub fn stopped() -> Self {
        Self {
            service_status: Observed::Confirmed(SystemServiceStatus::Stopped),
            dns_settings: Vec::new(),
            kernel_info: None,
        }
    }

    pub fn status(&self) -> SystemServiceStatus {
        *self.service_status.current()
    }

    pub fn default_domain(&self) -> Option<&DnsDomain> {
        self.dns_settings.iter().find(|d| d.is_default)
    }
}
