// ABOUTME: Image operations trait.
// ABOUTME: Listing and deleting images known to the tool.

use super::sealed::Sealed;
use crate::backend::BridgeError;
use crate::model::ContainerImage;
use crate::types::ImageRef;
use async_trait::async_trait;

#[async_trait]
pub trait ImageOps: Sealed + Send + Sync {
    async fn list_images(&self) -> Result<Vec<ContainerImage>, BridgeError>;

    async fn delete_image(&self, reference: &ImageRef) -> Result<(), BridgeError>;
}
