// ABOUTME: Local DNS domain operations trait.
// ABOUTME: Domains are validated before they reach the tool.

use super::sealed::Sealed;
use crate::backend::BridgeError;
use crate::model::DnsDomain;
use crate::types::DomainName;
use async_trait::async_trait;

#[async_trait]
pub trait DnsOps: Sealed + Send + Sync {
    async fn list_dns_domains(&self) -> Result<Vec<DnsDomain>, BridgeError>;

    async fn create_dns_domain(&self, domain: &DomainName) -> Result<(), BridgeError>;

    async fn delete_dns_domain(&self, domain: &DomainName) -> Result<(), BridgeError>;

    async fn set_default_dns_domain(&self, domain: &DomainName) -> Result<(), BridgeError>;
}
