//! The start pipeline.
//!
//! ```text
//! generate id -> host name -> key pair -> token + register -> pin hash + start daemon
//!                                                  |                   |
//!                                           FailedDirectory     unregister on failure
//! ```
//!
//! Each stage hands its output to the next as a named struct. A stage fails
//! with a [`StageFailure`], which decides the [`AsyncResult`] reported to the
//! caller.

use host_ipc::{
    AsyncResult, DaemonError, DirectoryError, HostConfiguration, HostRegistration, IdentityError,
    KeyPair,
};

use super::HostController;
use crate::host_id::HostId;
use crate::report::StartReport;

struct NamedHost {
    host_id: HostId,
    host_name: String,
}

struct KeyedHost {
    host_id: HostId,
    host_name: String,
    key_pair: KeyPair,
}

/// Registered with the directory, not yet running locally.
struct RegisteredHost {
    host_id: HostId,
    host_name: String,
    key_pair: KeyPair,
}

enum StageFailure {
    Daemon {
        stage: &'static str,
        error: DaemonError,
    },
    DaemonRefused(AsyncResult),
    Identity(IdentityError),
    Directory(DirectoryError),
}

impl StageFailure {
    fn result(&self) -> AsyncResult {
        match self {
            Self::Daemon { .. } | Self::Identity(_) => AsyncResult::Failed,
            Self::DaemonRefused(result) => *result,
            Self::Directory(_) => AsyncResult::FailedDirectory,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Daemon { stage, error } => format!("{stage} failed: {error}"),
            Self::DaemonRefused(result) => format!("daemon start returned {}", result.as_str()),
            Self::Identity(error) => format!("no auth token: {error}"),
            Self::Directory(error) => format!("registration failed: {error}"),
        }
    }
}

impl HostController {
    /// Register a new host with the directory and start the daemon with it.
    ///
    /// The registration is not atomic with the daemon start: if activation
    /// fails the directory record is removed again, but a crash in between
    /// leaves it behind for [`HostController::reconcile`].
    pub async fn start(&self, pin: &str, consent_to_crash_reports: bool) -> AsyncResult {
        self.start_with_report(pin, consent_to_crash_reports).await.result
    }

    pub async fn start_with_report(&self, pin: &str, consent_to_crash_reports: bool) -> StartReport {
        let _guard = self.operation_guard().await;

        let host_id = HostId::generate();
        log::info!("host controller: starting new host {host_id}");

        let registered = match self.register_new_host(host_id.clone()).await {
            Ok(registered) => registered,
            Err(failure) => {
                log::warn!("host controller: start of {host_id} aborted: {}", failure.describe());
                return StartReport {
                    result: failure.result(),
                    host_id,
                    compensation: None,
                };
            }
        };

        if let Err(failure) = self.activate(&registered, pin, consent_to_crash_reports).await {
            log::warn!(
                "host controller: activation of {host_id} failed, rolling back: {}",
                failure.describe()
            );
            let compensation = self.unregister(host_id.to_string()).await;
            return StartReport {
                result: failure.result(),
                host_id,
                compensation: Some(compensation),
            };
        }

        self.forget_pending(host_id.as_str()).await;
        if let Some(host_list) = &self.host_list {
            host_list.on_local_host_started(
                &registered.host_name,
                registered.host_id.as_str(),
                &registered.key_pair.public_key,
            );
        }
        log::info!("host controller: host {host_id} started");
        StartReport {
            result: AsyncResult::Ok,
            host_id,
            compensation: None,
        }
    }

    async fn register_new_host(&self, host_id: HostId) -> Result<RegisteredHost, StageFailure> {
        let named = self.name_host(host_id).await?;
        let keyed = self.generate_keys(named).await?;
        self.register(keyed).await
    }

    async fn name_host(&self, host_id: HostId) -> Result<NamedHost, StageFailure> {
        let host_name = self.daemon.host_name().await.map_err(|error| StageFailure::Daemon {
            stage: "host_name",
            error,
        })?;
        Ok(NamedHost { host_id, host_name })
    }

    async fn generate_keys(&self, named: NamedHost) -> Result<KeyedHost, StageFailure> {
        let key_pair = self
            .daemon
            .generate_key_pair()
            .await
            .map_err(|error| StageFailure::Daemon {
                stage: "generate_key_pair",
                error,
            })?;
        Ok(KeyedHost {
            host_id: named.host_id,
            host_name: named.host_name,
            key_pair,
        })
    }

    async fn register(&self, keyed: KeyedHost) -> Result<RegisteredHost, StageFailure> {
        let auth_token = self.identity.auth_token().await.map_err(StageFailure::Identity)?;

        let registration = HostRegistration {
            host_id: keyed.host_id.to_string(),
            host_name: keyed.host_name.clone(),
            public_key: keyed.key_pair.public_key.clone(),
        };
        self.remember_pending(keyed.host_id.as_str()).await;
        match self.directory.register_host(&registration, &auth_token).await {
            Ok(status) => {
                log::debug!(
                    "host controller: directory accepted {} ({})",
                    keyed.host_id,
                    status.status_code
                );
            }
            Err(error) => {
                // A transport failure may still have reached the directory;
                // leave the id journaled so a later sweep can remove it.
                if !matches!(error, DirectoryError::Transport { .. }) {
                    self.forget_pending(keyed.host_id.as_str()).await;
                }
                return Err(StageFailure::Directory(error));
            }
        }

        Ok(RegisteredHost {
            host_id: keyed.host_id,
            host_name: keyed.host_name,
            key_pair: keyed.key_pair,
        })
    }

    async fn activate(
        &self,
        registered: &RegisteredHost,
        pin: &str,
        consent_to_crash_reports: bool,
    ) -> Result<(), StageFailure> {
        let host_secret_hash = self
            .daemon
            .pin_hash(registered.host_id.as_str(), pin)
            .await
            .map_err(|error| StageFailure::Daemon {
                stage: "pin_hash",
                error,
            })?;

        let config = HostConfiguration {
            xmpp_login: self.identity.cached_email(),
            oauth_refresh_token: self.identity.export_refresh_token(),
            host_id: registered.host_id.to_string(),
            host_name: registered.host_name.clone(),
            host_secret_hash,
            private_key: registered.key_pair.private_key.clone(),
        };

        let result = self
            .daemon
            .start_daemon(config, consent_to_crash_reports)
            .await
            .map_err(|error| StageFailure::Daemon {
                stage: "start_daemon",
                error,
            })?;
        if !result.is_ok() {
            return Err(StageFailure::DaemonRefused(result));
        }
        Ok(())
    }
}
