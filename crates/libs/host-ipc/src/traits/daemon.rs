use async_trait::async_trait;

use crate::error::DaemonError;
use crate::types::*;

/// Querying and driving the daemon process.
#[async_trait]
pub trait DaemonLifecycle: Send + Sync {
    /// Current daemon state.
    async fn daemon_state(&self) -> Result<DaemonState, DaemonError>;

    /// Installed daemon version. An empty string means "not installed".
    async fn daemon_version(&self) -> Result<String, DaemonError>;

    /// Write `config` and start the daemon with it.
    async fn start_daemon(
        &self,
        config: HostConfiguration,
        consent_to_crash_reports: bool,
    ) -> Result<AsyncResult, DaemonError>;

    /// Stop the daemon. Stopping an already stopped daemon reports whatever
    /// the daemon decides, usually `Ok`.
    async fn stop_daemon(&self) -> Result<AsyncResult, DaemonError>;
}

/// The local host configuration record.
#[async_trait]
pub trait DaemonConfigStore: Send + Sync {
    /// Read the record. `None` when the daemon has no configuration at all.
    async fn daemon_config(&self) -> Result<Option<ConfigRecord>, DaemonError>;

    /// Merge `patch` into the stored record.
    async fn update_daemon_config(&self, patch: HostConfigPatch)
        -> Result<AsyncResult, DaemonError>;
}

/// Credential material the daemon derives on our behalf.
#[async_trait]
pub trait DaemonCredentials: Send + Sync {
    /// Generate a fresh key pair. Never reuses a previous one.
    async fn generate_key_pair(&self) -> Result<KeyPair, DaemonError>;

    /// Salted hash of `pin` for `host_id`.
    async fn pin_hash(&self, host_id: &str, pin: &str) -> Result<String, DaemonError>;

    /// Display name of this machine.
    async fn host_name(&self) -> Result<String, DaemonError>;
}

#[async_trait]
pub trait DaemonConsent: Send + Sync {
    async fn usage_stats_consent(&self) -> Result<UsageStatsConsent, DaemonError>;
}
