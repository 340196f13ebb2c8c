// ABOUTME: Backend that runs the container tool directly in this process.
// ABOUTME: Used by the helper to serve requests and by the CLI in direct mode.

use super::traits::sealed::Sealed;
use super::{BridgeError, ContainerOps, Deadlines, DnsOps, ImageOps, LogOps, SystemOps, args};
use crate::model::{Container, ContainerImage, DnsDomain, LogKind, LogQuery, SystemServiceStatus};
use crate::parse;
use crate::tool::{Executor, LineStream};
use crate::types::{ContainerId, DomainName, ImageRef};
use async_trait::async_trait;

pub struct LocalBackend {
    executor: Executor,
    deadlines: Deadlines,
    launcher: Vec<String>,
}

impl LocalBackend {
    pub fn new(executor: Executor, deadlines: Deadlines, launcher: Vec<String>) -> Self {
        Self {
            executor,
            deadlines,
            launcher,
        }
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    async fn listing(&self, args: Vec<String>) -> Result<String, BridgeError> {
        self.executor
            .run_with_timeout(&args, self.deadlines.listing)
            .await
    }

    async fn action(&self, args: Vec<String>) -> Result<String, BridgeError> {
        self.executor
            .run_with_timeout(&args, self.deadlines.action)
            .await
    }

    /// Launcher prefix followed by the tool's interactive shell invocation.
    fn terminal_command(&self, id: &ContainerId) -> Vec<String> {
        let mut argv = self.launcher.clone();
        argv.push(self.executor.tool().invocation());
        argv.extend(args::exec_shell(id));
        argv
    }
}

impl Sealed for LocalBackend {}

#[async_trait]
impl ContainerOps for LocalBackend {
    async fn list_containers(&self) -> Result<Vec<Container>, BridgeError> {
        let output = self.listing(args::list_containers()).await?;
        parse::parse_containers(&output)
    }

    async fn start_container(&self, id: &ContainerId) -> Result<(), BridgeError> {
        args::check_container_id(id)?;
        self.action(args::start_container(id)).await.map(drop)
    }

    async fn stop_container(&self, id: &ContainerId) -> Result<(), BridgeError> {
        args::check_container_id(id)?;
        self.action(args::stop_container(id)).await.map(drop)
    }

    async fn delete_container(&self, id: &ContainerId) -> Result<(), BridgeError> {
        args::check_container_id(id)?;
        self.action(args::delete_container(id)).await.map(drop)
    }

    async fn run_container(
        &self,
        image: &ImageRef,
        name: Option<&str>,
    ) -> Result<(), BridgeError> {
        self.action(args::run_container(image, name))
            .await
            .map(drop)
    }

    async fn open_terminal(&self, id: &ContainerId) -> Result<(), BridgeError> {
        args::check_container_id(id)?;
        Executor::launch(&self.terminal_command(id))
    }
}

#[async_trait]
impl ImageOps for LocalBackend {
    async fn list_images(&self) -> Result<Vec<ContainerImage>, BridgeError> {
        let output = self.listing(args::list_images()).await?;
        parse::parse_images(&output)
    }

    async fn delete_image(&self, reference: &ImageRef) -> Result<(), BridgeError> {
        self.action(args::delete_image(reference)).await.map(drop)
    }
}

#[async_trait]
impl LogOps for LocalBackend {
    async fn container_logs(
        &self,
        id: &ContainerId,
        lines: Option<u32>,
    ) -> Result<String, BridgeError> {
        args::check_container_id(id)?;
        self.action(args::container_logs(id, lines, false)).await
    }

    async fn container_boot_logs(&self, id: &ContainerId) -> Result<String, BridgeError> {
        args::check_container_id(id)?;
        self.action(args::container_boot_logs(id)).await
    }

    async fn system_logs(&self, window: Option<&str>) -> Result<String, BridgeError> {
        self.action(args::system_logs(window, false)).await
    }

    async fn follow_logs(
        &self,
        kind: &LogKind,
        query: &LogQuery,
    ) -> Result<LineStream, BridgeError> {
        if let LogKind::Container(id) | LogKind::ContainerBoot(id) = kind {
            args::check_container_id(id)?;
        }
        self.executor.stream(&args::follow_logs(kind, query))
    }
}

#[async_trait]
impl SystemOps for LocalBackend {
    async fn system_status(&self) -> Result<SystemServiceStatus, BridgeError> {
        let output = self.listing(args::system_status()).await?;
        Ok(parse::parse_system_status(&output))
    }

    async fn start_system(&self) -> Result<(), BridgeError> {
        self.action(args::system("start")).await.map(drop)
    }

    async fn stop_system(&self) -> Result<(), BridgeError> {
        self.action(args::system("stop")).await.map(drop)
    }

    async fn restart_system(&self) -> Result<(), BridgeError> {
        self.action(args::system("restart")).await.map(drop)
    }
}

#[async_trait]
impl DnsOps for LocalBackend {
    async fn list_dns_domains(&self) -> Result<Vec<DnsDomain>, BridgeError> {
        let output = self.listing(args::dns_list()).await?;
        Ok(parse::parse_dns_domains(&output))
    }

    async fn create_dns_domain(&self, domain: &DomainName) -> Result<(), BridgeError> {
        self.action(args::dns("create", domain)).await.map(drop)
    }

    async fn delete_dns_domain(&self, domain: &DomainName) -> Result<(), BridgeError> {
        self.action(args::dns("delete", domain)).await.map(drop)
    }

    async fn set_default_dns_domain(&self, domain: &DomainName) -> Result<(), BridgeError> {
        self.action(args::dns("default", domain)).await.map(drop)
    }
}
