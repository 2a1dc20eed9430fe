//! Lifecycle controller for the local remoting host.
//!
//! [`HostController`] orchestrates three collaborators from [`host_ipc`]:
//! Daemon Control (local), the host directory (remote) and the identity
//! provider (tokens). Each public workflow is a fixed pipeline of async
//! stages; a failing stage short-circuits the rest and, where a directory
//! record was already created, triggers a compensating unregister.
//!
//! The controller keeps no state of its own. The daemon's configuration
//! record and the directory are authoritative and are re-read on every call.

mod config;
mod controller;
mod host_id;
mod journal;
mod local_config;
mod report;

pub use config::{ControllerConfig, JournalSettings};
pub use controller::HostController;
pub use host_id::HostId;
pub use journal::{FileJournal, JournalError, MemoryJournal, NoJournal, RegistrationJournal};
pub use local_config::{is_host_config_valid, LocalHostConfig};
pub use report::{Compensation, ReconcileReport, StartReport, StopReport};

pub use host_ipc::{AsyncResult, DaemonState, UsageStatsConsent};
