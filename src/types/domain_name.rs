// ABOUTME: Validated local DNS domain names for the container system resolver.
// ABOUTME: Rejects values the tool would misread, such as the default-domain marker.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

const MAX_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainNameError {
    #[error("domain name cannot be empty")]
    Empty,

    #[error("domain name exceeds maximum length of {MAX_LEN} characters")]
    TooLong,

    #[error("domain label '{0}' is empty or longer than {MAX_LABEL_LEN} characters")]
    BadLabel(String),

    #[error("domain label '{0}' cannot start or end with a hyphen")]
    HyphenEdge(String),

    #[error("invalid character in domain name: '{0}'")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainName(String);

impl DomainName {
    pub fn new(value: &str) -> Result<Self, DomainNameError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(DomainNameError::Empty);
        }
        if value.len() > MAX_LEN {
            return Err(DomainNameError::TooLong);
        }
        if let Some(c) = value
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && *c != '-' && *c != '.')
        {
            return Err(DomainNameError::InvalidChar(c));
        }
        for label in value.split('.') {
            if label.is_empty() || label.len() > MAX_LABEL_LEN {
                return Err(DomainNameError::BadLabel(label.to_string()));
            }
            if label.starts_with('-') || label.ends_with('-') {
                return Err(DomainNameError::HyphenEdge(label.to_string()));
            }
        }
        Ok(Self(value.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for DomainName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DomainName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DomainName::new(&raw).map_err(serde::de::Error::custom)
    }
}
