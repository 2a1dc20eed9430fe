use async_trait::async_trait;

use crate::error::DaemonError;
use crate::traits::*;
use crate::types::*;

/// A daemon implementation that returns `NotImplemented` for every method.
///
/// Used on platforms without a daemon, and as the starting point when wiring
/// a new transport: replace stubs one method at a time.
pub struct StubDaemon;

#[async_trait]
impl DaemonLifecycle for StubDaemon {
    async fn daemon_state(&self) -> Result<DaemonState, DaemonError> {
        Err(DaemonError::not_implemented("daemon_state"))
    }

    async fn daemon_version(&self) -> Result<String, DaemonError> {
        Err(DaemonError::not_implemented("daemon_version"))
    }

    async fn start_daemon(
        &self,
        _config: HostConfiguration,
        _consent_to_crash_reports: bool,
    ) -> Result<AsyncResult, DaemonError> {
        Err(DaemonError::not_implemented("start_daemon"))
    }

    async fn stop_daemon(&self) -> Result<AsyncResult, DaemonError> {
        Err(DaemonError::not_implemented("stop_daemon"))
    }
}

#[async_trait]
impl DaemonConfigStore for StubDaemon {
    async fn daemon_config(&self) -> Result<Option<ConfigRecord>, DaemonError> {
        Err(DaemonError::not_implemented("daemon_config"))
    }

    async fn update_daemon_config(
        &self,
        _patch: HostConfigPatch,
    ) -> Result<AsyncResult, DaemonError> {
        Err(DaemonError::not_implemented("update_daemon_config"))
    }
}

#[async_trait]
impl DaemonCredentials for StubDaemon {
    async fn generate_key_pair(&self) -> Result<KeyPair, DaemonError> {
        Err(DaemonError::not_implemented("generate_key_pair"))
    }

    async fn pin_hash(&self, _host_id: &str, _pin: &str) -> Result<String, DaemonError> {
        Err(DaemonError::not_implemented("pin_hash"))
    }

    async fn host_name(&self) -> Result<String, DaemonError> {
        Err(DaemonError::not_implemented("host_name"))
    }
}

#[async_trait]
impl DaemonConsent for StubDaemon {
    async fn usage_stats_consent(&self) -> Result<UsageStatsConsent, DaemonError> {
        Err(DaemonError::not_implemented("usage_stats_consent"))
    }
}
