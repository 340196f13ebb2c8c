// ABOUTME: Container system service operations trait.
// ABOUTME: Status queries and service start, stop and restart.

use super::sealed::Sealed;
use crate::backend::BridgeError;
use crate::model::SystemServiceStatus;
use async_trait::async_trait;

#[async_trait]
pub trait SystemOps: Sealed + Send + Sync {
    /// Ask the tool directly whether its service is up.
    ///
    /// Less reliable than a successful listing; callers use it as a fallback.
    async fn system_status(&self) -> Result<SystemServiceStatus, BridgeError>;

    async fn start_system(&self) -> Result<(), BridgeError>;

    async fn stop_system(&self) -> Result<(), BridgeError>;

    async fn restart_system(&self) -> Result<(), BridgeError>;
}
