// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Rejects empty candidate and launcher lists with a readable message.

use nonempty::NonEmpty;
use serde::Deserialize;
use std::path::PathBuf;

pub fn deserialize_candidates<'de, D>(deserializer: D) -> Result<NonEmpty<PathBuf>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Vec<PathBuf> = Vec::deserialize(deserializer)?;
    if let Some(relative) = values.iter().find(|p| !p.is_absolute()) {
        return Err(serde::de::Error::custom(format!(
            "tool candidate {} must be an absolute path",
            relative.display()
        )));
    }
    NonEmpty::from_vec(values)
        .ok_or_else(|| serde::de::Error::custom("at least one tool candidate is required"))
}

pub fn deserialize_launcher<'de, D>(deserializer: D) -> Result<NonEmpty<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Vec<String> = Vec::deserialize(deserializer)?;
    NonEmpty::from_vec(values)
        .ok_or_else(|| serde::de::Error::custom("terminal launcher cannot be empty"))
}
