// ABOUTME: Log source descriptors and the options for fetching or following logs.
// ABOUTME: A source knows its kind, whether it can stream and which filters apply.

use super::Container;
use crate::types::{ContainerId, LogSourceId};
use serde::{Deserialize, Serialize};

/// Which log a request refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "id", rename_all = "snake_case")]
pub enum LogKind {
    Container(ContainerId),
    ContainerBoot(ContainerId),
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFilter {
    TimeRange,
    TextSearch,
}

/// A selectable log with presentation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSource {
    pub id: LogSourceId,
    pub title: String,
    pub kind: LogKind,
    pub supports_streaming: bool,
    pub filters: Vec<LogFilter>,
}

impl LogSource {
    pub fn container(container: &Container) -> Self {
        Self {
            id: LogSourceId::new(format!("container-{}", container.id)),
            title: format!("Container: {}", container.display_name()),
            kind: LogKind::Container(container.id.clone()),
            supports_streaming: true,
            filters: vec![LogFilter::TimeRange, LogFilter::TextSearch],
        }
    }

    pub fn container_boot(container: &Container) -> Self {
        Self {
            id: LogSourceId::new(format!("boot-{}", container.id)),
            title: format!("Boot Logs: {}", container.display_name()),
            kind: LogKind::ContainerBoot(container.id.clone()),
            supports_streaming: false,
            filters: vec![LogFilter::TextSearch],
        }
    }

    pub fn system() -> Self {
        Self {
            id: LogSourceId::new("system"),
            title: "System Logs".to_string(),
            kind: LogKind::System,
            supports_streaming: false,
            filters: vec![LogFilter::TimeRange, LogFilter::TextSearch],
        }
    }

    pub fn supports(&self, filter: LogFilter) -> bool {
        self.filters.contains(&filter)
    }
}

/// Options for a log fetch. Fields that do not apply to a source are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogQuery {
    /// Trailing line count for container logs.
    pub lines: Option<u32>,
    /// Time window for system logs, in the tool's syntax (e.g. `5m`).
    pub window: Option<String>,
}

impl LogQuery {
    pub fn tail(lines: u32) -> Self {
        Self {
            lines: Some(lines),
            window: None,
        }
    }

    pub fn last(window: impl Into<String>) -> Self {
        Self {
            lines: None,
            window: Some(window.into()),
        }
    }
}
