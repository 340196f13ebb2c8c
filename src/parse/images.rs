// ABOUTME: Parser for `image ls --format json` output.
// ABOUTME: Records with an unusable reference are skipped with a warning.

use super::DescriptorRecord;
use crate::backend::BridgeError;
use crate::model::ContainerImage;
use crate::types::ImageRef;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ImageListRecord {
    reference: String,
    #[serde(default)]
    descriptor: Option<DescriptorRecord>,
}

/// Parse an image listing. Blank output is an empty listing.
pub fn parse_images(output: &str) -> Result<Vec<ContainerImage>, BridgeError> {
    if output.trim().is_empty() {
        return Ok(Vec::new());
    }

    let records: Vec<ImageListRecord> = serde_json::from_str(output)
        .map_err(|e| BridgeError::InvalidOutput(format!("image listing: {e}")))?;

    Ok(records
        .into_iter()
        .filter_map(|record| {
            let reference = match ImageRef::parse(&record.reference) {
                Ok(reference) => reference,
                Err(e) => {
                    tracing::warn!(reference = %record.reference, error = %e, "skipping image with bad reference");
                    return None;
                }
            };
            let descriptor = record.descriptor.unwrap_or_default();
            Some(ContainerImage {
                name: reference.name().to_string(),
                tag: reference.tag().to_string(),
                registry: reference.registry().to_string(),
                repository: reference.repository().to_string(),
                digest: descriptor.digest,
                media_type: descriptor.media_type,
                size: descriptor.size,
                reference,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_reference_skips_only_that_image() {
        let images = parse_images(r#"[{"reference":"-x"},{"reference":"alpine"}]"#)
            .expect("listing should parse");
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].name, "alpine");
    }

    #[test]
    fn missing_descriptor_yields_empty_metadata() {
        let images = parse_images(r#"[{"reference":"alpine:3.20"}]"#).expect("should parse");
        assert_eq!(images[0].size, 0);
        assert_eq!(images[0].digest, "");
        assert_eq!(images[0].display_name(), "alpine:3.20");
    }
}
