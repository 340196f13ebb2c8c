// ABOUTME: Image records derived from the tool's image listing.
// ABOUTME: Registry, repository and tag are split from the reference once.

use crate::types::{DEFAULT_REGISTRY, ImageRef};
use serde::{Deserialize, Serialize};

const SHORT_DIGEST_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerImage {
    pub reference: ImageRef,
    pub name: String,
    pub tag: String,
    pub digest: String,
    pub media_type: String,
    pub size: u64,
    pub registry: String,
    pub repository: String,
}

impl ContainerImage {
    pub fn display_name(&self) -> String {
        format!("{}:{}", self.name, self.tag)
    }

    /// Digest without its algorithm prefix, cut to twelve characters.
    pub fn short_digest(&self) -> &str {
        let hex = self
            .digest
            .split_once(':')
            .map_or(self.digest.as_str(), |(_, hex)| hex);
        hex.get(..SHORT_DIGEST_LEN).unwrap_or(hex)
    }

    pub fn is_docker_hub(&self) -> bool {
        self.registry == DEFAULT_REGISTRY
    }
}
