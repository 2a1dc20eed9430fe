mod start;

use std::sync::Arc;

use host_directory::HttpDirectoryClient;
use host_ipc::{
    AsyncResult, DaemonControl, DaemonError, DaemonState, DirectoryClient, DirectoryError,
    HostConfigPatch, HostListObserver, IdentityProvider, UsageStatsConsent,
};
use tokio::sync::{Mutex, MutexGuard};

use crate::config::ControllerConfig;
use crate::journal::{FileJournal, NoJournal, RegistrationJournal};
use crate::local_config::LocalHostConfig;
use crate::report::{Compensation, ReconcileReport, StopReport};

/// Registers, starts, stops and re-PINs the local host.
///
/// Construct one per session and share it by reference. With single-flight
/// enabled (the default) the mutating workflows queue behind each other;
/// queries never wait.
pub struct HostController {
    daemon: Arc<dyn DaemonControl>,
    directory: Arc<dyn DirectoryClient>,
    identity: Arc<dyn IdentityProvider>,
    host_list: Option<Arc<dyn HostListObserver>>,
    journal: Arc<dyn RegistrationJournal>,
    single_flight: Option<Mutex<()>>,
}

impl HostController {
    pub fn new(
        daemon: Arc<dyn DaemonControl>,
        directory: Arc<dyn DirectoryClient>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            daemon,
            directory,
            identity,
            host_list: None,
            journal: Arc::new(NoJournal),
            single_flight: Some(Mutex::new(())),
        }
    }

    /// Wire the HTTP directory client and the journal described by `config`.
    pub fn from_config(
        config: &ControllerConfig,
        daemon: Arc<dyn DaemonControl>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        let directory = Arc::new(HttpDirectoryClient::new(&config.directory, identity.clone()));
        let mut controller =
            Self::new(daemon, directory, identity).with_single_flight(config.single_flight);
        if let Some(path) = &config.journal.path {
            controller = controller.with_journal(Arc::new(FileJournal::new(path)));
        }
        controller
    }

    pub fn with_host_list(mut self, host_list: Arc<dyn HostListObserver>) -> Self {
        self.host_list = Some(host_list);
        self
    }

    pub fn with_journal(mut self, journal: Arc<dyn RegistrationJournal>) -> Self {
        self.journal = journal;
        self
    }

    /// Without single-flight, overlapping calls race in the collaborators
    /// and keeping them apart is up to the caller.
    pub fn with_single_flight(mut self, enabled: bool) -> Self {
        self.single_flight = enabled.then(|| Mutex::new(()));
        self
    }

    async fn operation_guard(&self) -> Option<MutexGuard<'_, ()>> {
        match &self.single_flight {
            Some(lock) => Some(lock.lock().await),
            None => None,
        }
    }

    /// State of the local daemon, exactly as Daemon Control reports it.
    pub async fn local_host_state(&self) -> Result<DaemonState, DaemonError> {
        self.daemon.daemon_state().await
    }

    /// Id of the registered local host, if any.
    ///
    /// Best effort: an invalid record and a failed read both yield `None`.
    pub async fn local_host_id(&self) -> Option<String> {
        match self.daemon.daemon_config().await {
            Ok(record) => LocalHostConfig::from_record(record.as_ref()).map(|config| config.host_id),
            Err(err) => {
                log::debug!("host controller: local config unavailable: {err}");
                None
            }
        }
    }

    pub async fn consent(&self) -> Result<UsageStatsConsent, DaemonError> {
        self.daemon.usage_stats_consent().await
    }

    /// Log the installed daemon version. `None` if not installed or unknown.
    pub async fn probe_daemon_version(&self) -> Option<String> {
        match self.daemon.daemon_version().await {
            Ok(version) if version.is_empty() => {
                log::info!("host not installed");
                None
            }
            Ok(version) => {
                log::info!("host version: {version}");
                Some(version)
            }
            Err(err) => {
                log::info!("host version not available: {err}");
                None
            }
        }
    }

    /// Stop the daemon, then remove the local host from the directory.
    pub async fn stop(&self) -> AsyncResult {
        self.stop_with_report().await.result
    }

    pub async fn stop_with_report(&self) -> StopReport {
        let _guard = self.operation_guard().await;

        let result = match self.daemon.stop_daemon().await {
            Ok(result) => result,
            Err(err) => {
                log::warn!("host controller: stop_daemon failed: {err}");
                AsyncResult::Failed
            }
        };
        if !result.is_ok() {
            log::warn!("host controller: daemon did not stop: {}", result.as_str());
            return StopReport { result, unregistration: None };
        }

        let unregistration = match self.local_host_id().await {
            Some(host_id) => Some(self.unregister(host_id).await),
            None => {
                log::debug!("host controller: stopped daemon has no registered host");
                None
            }
        };
        log::info!("host controller: host stopped");
        StopReport { result: AsyncResult::Ok, unregistration }
    }

    /// Replace the PIN of the registered local host.
    pub async fn update_pin(&self, new_pin: &str) -> AsyncResult {
        let _guard = self.operation_guard().await;

        let record = match self.daemon.daemon_config().await {
            Ok(record) => record,
            Err(err) => {
                log::warn!("host controller: cannot read config to update pin: {err}");
                return AsyncResult::Failed;
            }
        };
        let Some(local) = LocalHostConfig::from_record(record.as_ref()) else {
            log::warn!("host controller: no registered host, pin not updated");
            return AsyncResult::Failed;
        };

        let pin_hash = match self.daemon.pin_hash(&local.host_id, new_pin).await {
            Ok(hash) => hash,
            Err(err) => {
                log::warn!("host controller: pin hash failed: {err}");
                return AsyncResult::Failed;
            }
        };

        match self.daemon.update_daemon_config(HostConfigPatch::pin_hash(pin_hash)).await {
            Ok(result) => {
                log::info!("host controller: pin update {}", result.as_str());
                result
            }
            Err(err) => {
                log::warn!("host controller: config update failed: {err}");
                AsyncResult::Failed
            }
        }
    }

    /// Remove directory records left behind by starts that never finished.
    ///
    /// Run at startup, before any start. A pending id is kept only while it
    /// names the local host and that host is starting or running; a stopped
    /// daemon whose configuration still names the id was never activated.
    /// Unregisters that fail stay pending.
    pub async fn reconcile(&self) -> ReconcileReport {
        let _guard = self.operation_guard().await;

        let mut report = ReconcileReport::default();
        let pending = match self.journal.pending().await {
            Ok(pending) => pending,
            Err(err) => {
                log::warn!("host controller: cannot read registration journal: {err}");
                return report;
            }
        };
        if pending.is_empty() {
            return report;
        }

        let active_host_id = self.active_host_id().await;
        for host_id in pending {
            if active_host_id.as_deref() == Some(host_id.as_str()) {
                self.forget_pending(&host_id).await;
                report.kept.push(host_id);
                continue;
            }

            match self.directory.unregister_host(&host_id).await {
                Ok(()) | Err(DirectoryError::Rejected { status: 404, .. }) => {
                    log::info!("host controller: removed orphaned registration {host_id}");
                    self.forget_pending(&host_id).await;
                    report.removed.push(host_id);
                }
                Err(err) => {
                    log::warn!("host controller: orphaned registration {host_id} kept: {err}");
                    report.failed.push(host_id);
                }
            }
        }
        report
    }

    /// Id of the local host if the daemon is starting or running with it.
    async fn active_host_id(&self) -> Option<String> {
        let host_id = self.local_host_id().await?;
        match self.daemon.daemon_state().await {
            Ok(DaemonState::Starting | DaemonState::Started) => Some(host_id),
            Ok(state) => {
                log::debug!("host controller: local host {host_id} is {}", state.as_str());
                None
            }
            Err(err) => {
                log::debug!("host controller: daemon state unavailable: {err}");
                None
            }
        }
    }

    /// Unregister `host_id`, observing but never propagating the outcome.
    async fn unregister(&self, host_id: String) -> Compensation {
        let outcome = self.directory.unregister_host(&host_id).await;
        match &outcome {
            Ok(()) => {
                log::info!("host controller: unregistered host {host_id}");
                self.forget_pending(&host_id).await;
            }
            Err(err) => log::warn!("host controller: failed to unregister host {host_id}: {err}"),
        }
        Compensation { host_id, outcome }
    }

    async fn remember_pending(&self, host_id: &str) {
        if let Err(err) = self.journal.record_pending(host_id).await {
            log::warn!("host controller: cannot journal registration {host_id}: {err}");
        }
    }

    async fn forget_pending(&self, host_id: &str) {
        if let Err(err) = self.journal.clear(host_id).await {
            log::warn!("host controller: cannot clear journaled registration {host_id}: {err}");
        }
    }
}
