// ABOUTME: Local DNS domain commands.
// ABOUTME: Lists, creates, deletes and defaults local DNS domains.

use crate::cli::DnsCommand;
use berth::backend::FullBackend;
use berth::error::{Error, Result};
use berth::output::Output;
use berth::sync::Synchronizer;
use berth::types::DomainName;

fn domain_name(raw: &str) -> Result<DomainName> {
    DomainName::new(raw).map_err(|e| Error::InvalidArgument(e.to_string()))
}

pub async fn execute<B: FullBackend>(
    sync: &Synchronizer<B>,
    command: DnsCommand,
    output: &Output,
) -> Result<()> {
    match command {
        DnsCommand::List => output.domains(&sync.list_dns_domains().await?),
        DnsCommand::Create { domain } => {
            let domain = domain_name(&domain)?;
            sync.create_dns_domain(&domain).await?;
            output.success(&format!("Created DNS domain {domain}"));
        }
        DnsCommand::Delete { domain } => {
            let domain = domain_name(&domain)?;
            sync.delete_dns_domain(&domain).await?;
            output.success(&format!("Deleted DNS domain {domain}"));
        }
        DnsCommand::Default { domain } => {
            let domain = domain_name(&domain)?;
            sync.set_default_dns_domain(&domain).await?;
            output.success(&format!("Default DNS domain is now {domain}"));
        }
    }
    Ok(())
}
