// ABOUTME: Container operations trait.
// ABOUTME: List, start, stop, delete, run and open a terminal into containers.

use super::sealed::Sealed;
use crate::backend::BridgeError;
use crate::model::Container;
use crate::types::{ContainerId, ImageRef};
use async_trait::async_trait;

#[async_trait]
pub trait ContainerOps: Sealed + Send + Sync {
    /// All containers, running or not.
    async fn list_containers(&self) -> Result<Vec<Container>, BridgeError>;

    async fn start_container(&self, id: &ContainerId) -> Result<(), BridgeError>;

    async fn stop_container(&self, id: &ContainerId) -> Result<(), BridgeError>;

    async fn delete_container(&self, id: &ContainerId) -> Result<(), BridgeError>;

    /// Create and start a detached container from `image`.
    async fn run_container(&self, image: &ImageRef, name: Option<&str>)
    -> Result<(), BridgeError>;

    /// Open an interactive shell into the container in a new terminal window.
    async fn open_terminal(&self, id: &ContainerId) -> Result<(), BridgeError>;
}
