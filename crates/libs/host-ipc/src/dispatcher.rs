use std::sync::Arc;

use async_trait::async_trait;

use crate::error::DaemonError;
use crate::traits::*;
use crate::types::*;

/// Front for a Daemon Control backend whose construction may fail.
///
/// The backend is built once, eagerly. If the factory fails the reason is
/// kept and every call reports `DaemonError::Unavailable`, so a missing
/// plugin or helper process degrades into per-operation errors.
pub struct DaemonDispatcher {
    backend: Result<Arc<dyn DaemonControl>, String>,
}

impl DaemonDispatcher {
    pub fn new<F>(factory: F) -> Self
    where
        F: FnOnce() -> Result<Arc<dyn DaemonControl>, DaemonError>,
    {
        let backend = match factory() {
            Ok(backend) => Ok(backend),
            Err(err) => {
                log::warn!("daemon control unavailable: {err}");
                Err(err.to_string())
            }
        };
        Self { backend }
    }

    /// Wrap an already constructed backend.
    pub fn with_backend(backend: Arc<dyn DaemonControl>) -> Self {
        Self { backend: Ok(backend) }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_ok()
    }

    fn backend(&self) -> Result<&dyn DaemonControl, DaemonError> {
        match &self.backend {
            Ok(backend) => Ok(backend.as_ref()),
            Err(reason) => Err(DaemonError::unavailable(reason.clone())),
        }
    }
}

#[async_trait]
impl DaemonLifecycle for DaemonDispatcher {
    async fn daemon_state(&self) -> Result<DaemonState, DaemonError> {
        self.backend()?.daemon_state().await
    }

    async fn daemon_version(&self) -> Result<String, DaemonError> {
        self.backend()?.daemon_version().await
    }

    async fn start_daemon(
        &self,
        config: HostConfiguration,
        consent_to_crash_reports: bool,
    ) -> Result<AsyncResult, DaemonError> {
        self.backend()?
            .start_daemon(config, consent_to_crash_reports)
            .await
    }

    async fn stop_daemon(&self) -> Result<AsyncResult, DaemonError> {
        self.backend()?.stop_daemon().await
    }
}

#[async_trait]
impl DaemonConfigStore for DaemonDispatcher {
    async fn daemon_config(&self) -> Result<Option<ConfigRecord>, DaemonError> {
        self.backend()?.daemon_config().await
    }

    async fn update_daemon_config(
        &self,
        patch: HostConfigPatch,
    ) -> Result<AsyncResult, DaemonError> {
        self.backend()?.update_daemon_config(patch).await
    }
}

#[async_trait]
impl DaemonCredentials for DaemonDispatcher {
    async fn generate_key_pair(&self) -> Result<KeyPair, DaemonError> {
        self.backend()?.generate_key_pair().await
    }

    async fn pin_hash(&self, host_id: &str, pin: &str) -> Result<String, DaemonError> {
        self.backend()?.pin_hash(host_id, pin).await
    }

    async fn host_name(&self) -> Result<String, DaemonError> {
        self.backend()?.host_name().await
    }
}

#[async_trait]
impl DaemonConsent for DaemonDispatcher {
    async fn usage_stats_consent(&self) -> Result<UsageStatsConsent, DaemonError> {
        self.backend()?.usage_stats_consent().await
    }
}
