// ABOUTME: Parser for `ls -a --format json` output.
// ABOUTME: Maps listing records into Container values and status words.

use super::DescriptorRecord;
use crate::backend::BridgeError;
use crate::model::{Container, ContainerNetwork, ContainerStatus, Observed};
use crate::types::{ContainerId, ImageRef};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ContainerRecord {
    status: String,
    #[serde(default)]
    networks: Option<Vec<NetworkRecord>>,
    configuration: ConfigurationRecord,
}

#[derive(Debug, Deserialize)]
struct NetworkRecord {
    #[serde(default)]
    hostname: Option<String>,
    #[serde(default)]
    address: String,
    #[serde(default)]
    gateway: String,
    #[serde(default)]
    network: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigurationRecord {
    id: String,
    #[serde(default)]
    hostname: Option<String>,
    image: ImageRecord,
    platform: PlatformRecord,
    resources: ResourcesRecord,
    #[serde(default)]
    rosetta: bool,
}

#[derive(Debug, Deserialize)]
struct ImageRecord {
    reference: String,
    #[serde(default)]
    descriptor: Option<DescriptorRecord>,
}

#[derive(Debug, Deserialize)]
struct PlatformRecord {
    architecture: String,
    os: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourcesRecord {
    cpus: u32,
    memory_in_bytes: u64,
}

/// Map the tool's status word onto a status. Unknown words read as stopped.
pub fn parse_status(raw: &str) -> ContainerStatus {
    match raw.trim().to_lowercase().as_str() {
        "running" => ContainerStatus::Running,
        "stopped" | "stop" => ContainerStatus::Stopped,
        "exited" | "exit" => ContainerStatus::Exited,
        other => {
            tracing::debug!(status = other, "unrecognized container status");
            ContainerStatus::Stopped
        }
    }
}

/// Parse a container listing. Blank output is an empty listing.
pub fn parse_containers(output: &str) -> Result<Vec<Container>, BridgeError> {
    if output.trim().is_empty() {
        return Ok(Vec::new());
    }

    let records: Vec<ContainerRecord> = serde_json::from_str(output)
        .map_err(|e| BridgeError::InvalidOutput(format!("container listing: {e}")))?;

    Ok(records.into_iter().filter_map(into_container).collect())
}

/// `None` when the image reference is unusable; the record is skipped.
fn into_container(record: ContainerRecord) -> Option<Container> {
    let config = record.configuration;
    let reference = match ImageRef::parse(&config.image.reference) {
        Ok(reference) => reference,
        Err(e) => {
            tracing::warn!(id = %config.id, error = %e, "skipping container with bad image reference");
            return None;
        }
    };
    let hostname = config.hostname.unwrap_or_default();
    let digest = config
        .image
        .descriptor
        .map(|d| d.digest)
        .filter(|d| !d.is_empty());

    let networks = record
        .networks
        .unwrap_or_default()
        .into_iter()
        .map(|n| ContainerNetwork {
            network: n.network,
            hostname: n.hostname,
            address: n.address,
            gateway: n.gateway,
        })
        .collect();

    Some(Container {
        id: ContainerId::new(config.id),
        name: hostname.clone(),
        hostname,
        image: reference.short_name().to_string(),
        image_reference: reference,
        image_digest: digest,
        status: Observed::Confirmed(parse_status(&record.status)),
        os: config.platform.os,
        arch: config.platform.architecture,
        cpus: config.resources.cpus,
        memory_in_bytes: config.resources.memory_in_bytes,
        networks,
        rosetta: config.rosetta,
    })
}
