// ABOUTME: The observable state published by the synchronizer.
// ABOUTME: Cloned out to callers and sent to watch subscribers.

use crate::model::{Container, ContainerImage, SystemInfo};
use crate::types::ContainerId;
use chrono::{DateTime, Utc};

/// Everything known about the container system as of the last refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub containers: Vec<Container>,
    pub images: Vec<ContainerImage>,
    pub system_info: Option<SystemInfo>,
    /// True while at least one refresh is in flight.
    pub loading: bool,
    pub error: Option<String>,
    pub refreshed_at: Option<DateTime<Utc>>,
    pub(crate) in_flight: usize,
}

impl Snapshot {
    pub fn container(&self, id: &ContainerId) -> Option<&Container> {
        self.containers.iter().find(|c| &c.id == id)
    }

    pub fn running_count(&self) -> usize {
        self.containers.iter().filter(|c| c.is_running()).count()
    }
}
