// ABOUTME: Log operations trait.
// ABOUTME: One-shot log fetches return text; following returns a line stream.

use super::sealed::Sealed;
use crate::backend::BridgeError;
use crate::model::{LogKind, LogQuery};
use crate::tool::LineStream;
use crate::types::ContainerId;
use async_trait::async_trait;

#[async_trait]
pub trait LogOps: Sealed + Send + Sync {
    /// Container output, optionally only the last `lines`.
    async fn container_logs(
        &self,
        id: &ContainerId,
        lines: Option<u32>,
    ) -> Result<String, BridgeError>;

    async fn container_boot_logs(&self, id: &ContainerId) -> Result<String, BridgeError>;

    /// Container system logs, optionally limited to a trailing time window.
    async fn system_logs(&self, window: Option<&str>) -> Result<String, BridgeError>;

    /// Follow a log until the stream is dropped or the tool exits.
    async fn follow_logs(&self, kind: &LogKind, query: &LogQuery)
    -> Result<LineStream, BridgeError>;
}
