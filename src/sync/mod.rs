// ABOUTME: Keeps a local snapshot of the container system in step with the tool.
// ABOUTME: Applies optimistic transitions, then lets the next refresh overwrite them.

mod snapshot;

pub use snapshot::Snapshot;

use crate::backend::{BridgeError, FullBackend};
use crate::model::{
    Container, ContainerStatus, DnsDomain, LogKind, LogQuery, LogSource, Observed, SystemInfo,
    SystemServiceStatus,
};
use crate::tool::LineStream;
use crate::types::{ContainerId, DomainName, ImageRef};
use chrono::Utc;
use std::time::Duration;
use tokio::sync::watch;

/// Message recorded when a listing cannot reach the container system.
pub const SYSTEM_NOT_RUNNING: &str = "Container system is not running";

/// Pause after starting the system before it is expected to answer.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Counts a refresh as in flight until dropped, including on cancellation.
/// The error is cleared only when no other refresh is outstanding.
struct InFlight<'a>(&'a watch::Sender<Snapshot>);

impl<'a> InFlight<'a> {
    fn begin(state: &'a watch::Sender<Snapshot>) -> Self {
        state.send_modify(|s| {
            if s.in_flight == 0 {
                s.error = None;
            }
            s.in_flight += 1;
            s.loading = true;
        });
        Self(state)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.send_modify(|s| {
            s.in_flight = s.in_flight.saturating_sub(1);
            s.loading = s.in_flight > 0;
        });
    }
}

pub struct Synchronizer<B> {
    backend: B,
    state: watch::Sender<Snapshot>,
    settle_delay: Duration,
}

impl<B: FullBackend> Synchronizer<B> {
    pub fn new(backend: B) -> Self {
        let (state, _) = watch::channel(Snapshot::default());
        Self {
            backend,
            state,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.borrow().clone()
    }

    /// Receiver notified after every snapshot change.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.state.subscribe()
    }

    pub fn container(&self, id: &ContainerId) -> Option<Container> {
        self.state.borrow().container(id).cloned()
    }


    fn mark_container(&self, id: &ContainerId, status: ContainerStatus) {
        self.state.send_modify(|s| {
            if let Some(c) = s.containers.iter_mut().find(|c| &c.id == id) {
                c.status = Observed::Pending(status);
            }
        });
    }

    fn mark_system(&self, status: Observed<SystemServiceStatus>) {
        self.state.send_modify(|s| {
            if let Some(info) = s.system_info.as_mut() {
                info.service_status = status;
            }
        });
    }

    pub async fn refresh_containers(&self) -> Result<(), BridgeError> {
        let _refresh = InFlight::begin(&self.state);
        let result = self.backend.list_containers().await;

        self.state.send_modify(|s| {
            match &result {
                Ok(containers) => {
                    s.containers = containers.clone();
                    s.refreshed_at = Some(Utc::now());
                }
                Err(e) if e.is_connection_lost() => {
                    s.error = Some(SYSTEM_NOT_RUNNING.to_string());
                    let stopped = Observed::Confirmed(SystemServiceStatus::Stopped);
                    match s.system_info.as_mut() {
                        Some(info) => info.service_status = stopped,
                        None => s.system_info = Some(SystemInfo::stopped()),
                    }
                }
                Err(e) => s.error = Some(format!("Failed to load containers: {e}")),
            }
        });

        if let Err(e) = &result {
            tracing::warn!(error = %e, "container refresh failed");
        }
        result.map(drop)
    }

    pub async fn refresh_images(&self) -> Result<(), BridgeError> {
        let _refresh = InFlight::begin(&self.state);
        let result = self.backend.list_images().await;

        self.state.send_modify(|s| {
            match &result {
                Ok(images) => {
                    s.images = images.clone();
                    s.refreshed_at = Some(Utc::now());
                }
                Err(e) => s.error = Some(format!("Failed to load images: {e}")),
            }
        });

        if let Err(e) = &result {
            tracing::warn!(error = %e, "image refresh failed");
        }
        result.map(drop)
    }

    pub async fn refresh_system_info(&self) -> Result<(), BridgeError> {
        let _refresh = InFlight::begin(&self.state);
        let status = self.system_status().await;
        let dns = if status == SystemServiceStatus::Running {
            self.backend.list_dns_domains().await
        } else {
            Ok(Vec::new())
        };

        self.state.send_modify(|s| {
            let previous = s
                .system_info
                .take()
                .map(|info| info.dns_settings)
                .unwrap_or_default();
            let dns_settings = match &dns {
                Ok(domains) => domains.clone(),
                Err(e) => {
                    s.error = Some(format!("Failed to load DNS domains: {e}"));
                    previous
                }
            };
            s.system_info = Some(SystemInfo {
                service_status: Observed::Confirmed(status),
                dns_settings,
                kernel_info: None,
            });
        });

        if let Err(e) = &dns {
            tracing::warn!(error = %e, "DNS refresh failed");
        }
        dns.map(drop)
    }

    /// Refresh containers, images and system info concurrently.
    pub async fn refresh_all(&self) -> Result<(), BridgeError> {
        let (containers, images, system) = futures::join!(
            self.refresh_containers(),
            self.refresh_images(),
            self.refresh_system_info()
        );
        containers.and(images).and(system)
    }

    /// Infer whether the container system is up.
    ///
    /// A successful listing is the strongest signal; the tool's own status
    /// report is only consulted when the listing fails for another reason.
    pub async fn system_status(&self) -> SystemServiceStatus {
        match self.backend.list_containers().await {
            Ok(_) => SystemServiceStatus::Running,
            Err(e) if e.is_connection_lost() => SystemServiceStatus::Stopped,
            Err(e) => {
                tracing::debug!(error = %e, "listing failed; asking for system status");
                self.backend
                    .system_status()
                    .await
                    .unwrap_or(SystemServiceStatus::Stopped)
            }
        }
    }

    /// Start the system if it is not running, then give it time to settle.
    ///
    /// Returns the status observed before any start was attempted.
    pub async fn ensure_system_started(&self) -> Result<SystemServiceStatus, BridgeError> {
        let status = self.system_status().await;
        if status == SystemServiceStatus::Running {
            return Ok(status);
        }
        tracing::info!(%status, "container system not running; starting it");
        self.start_system().await?;
        tokio::time::sleep(self.settle_delay).await;
        Ok(status)
    }

    pub async fn start_container(&self, id: &ContainerId) -> Result<(), BridgeError> {
        self.mark_container(id, ContainerStatus::Starting);
        self.backend.start_container(id).await
    }

    pub async fn stop_container(&self, id: &ContainerId) -> Result<(), BridgeError> {
        self.mark_container(id, ContainerStatus::Stopping);
        self.backend.stop_container(id).await
    }

    pub async fn delete_container(&self, id: &ContainerId) -> Result<(), BridgeError> {
        self.backend.delete_container(id).await
    }

    pub async fn delete_image(&self, reference: &ImageRef) -> Result<(), BridgeError> {
        self.backend.delete_image(reference).await
    }

    pub async fn create_and_run_container(
        &self,
        image: &ImageRef,
        name: Option<&str>,
    ) -> Result<(), BridgeError> {
        self.backend.run_container(image, name).await
    }

    pub async fn open_terminal(&self, id: &ContainerId) -> Result<(), BridgeError> {
        self.backend.open_terminal(id).await
    }

    pub async fn get_container_logs(
        &self,
        id: &ContainerId,
        lines: Option<u32>,
    ) -> Result<String, BridgeError> {
        self.backend.container_logs(id, lines).await
    }

    pub async fn get_container_boot_logs(&self, id: &ContainerId) -> Result<String, BridgeError> {
        self.backend.container_boot_logs(id).await
    }

    pub async fn get_system_logs(&self, window: Option<&str>) -> Result<String, BridgeError> {
        self.backend.system_logs(window).await
    }

    /// One-shot fetch of whatever log `source` names.
    pub async fn fetch_logs(
        &self,
        source: &LogSource,
        query: &LogQuery,
    ) -> Result<String, BridgeError> {
        match &source.kind {
            LogKind::Container(id) => self.get_container_logs(id, query.lines).await,
            LogKind::ContainerBoot(id) => self.get_container_boot_logs(id).await,
            LogKind::System => self.get_system_logs(query.window.as_deref()).await,
        }
    }

    pub async fn follow_logs(
        &self,
        source: &LogSource,
        query: &LogQuery,
    ) -> Result<LineStream, BridgeError> {
        self.backend.follow_logs(&source.kind, query).await
    }

    pub async fn start_system(&self) -> Result<(), BridgeError> {
        self.mark_system(Observed::Pending(SystemServiceStatus::Starting));
        self.backend.start_system().await
    }

    pub async fn stop_system(&self) -> Result<(), BridgeError> {
        self.backend.stop_system().await
    }

    pub async fn restart_system(&self) -> Result<(), BridgeError> {
        self.mark_system(Observed::Pending(SystemServiceStatus::Starting));
        self.backend.restart_system().await
    }

    pub async fn list_dns_domains(&self) -> Result<Vec<DnsDomain>, BridgeError> {
        self.backend.list_dns_domains().await
    }

    pub async fn create_dns_domain(&self, domain: &DomainName) -> Result<(), BridgeError> {
        self.backend.create_dns_domain(domain).await
    }

    pub async fn delete_dns_domain(&self, domain: &DomainName) -> Result<(), BridgeError> {
        self.backend.delete_dns_domain(domain).await
    }

    pub async fn set_default_dns_domain(&self, domain: &DomainName) -> Result<(), BridgeError> {
        self.backend.set_default_dns_domain(domain).await
    }
}
