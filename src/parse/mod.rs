// ABOUTME: Pure parsers from container tool stdout to domain records.
// ABOUTME: One parser per command family; malformed input is an InvalidOutput error.

mod containers;
mod dns;
mod images;
mod system;

pub use containers::{parse_containers, parse_status};
pub use dns::parse_dns_domains;
pub use images::parse_images;
pub use system::parse_system_status;

use serde::Deserialize;

/// Descriptor block shared by container and image records.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescriptorRecord {
    #[serde(default)]
    media_type: String,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    digest: String,
}
