use host_ipc::{AsyncResult, DirectoryError};

use crate::host_id::HostId;

/// Best-effort removal of a directory record.
///
/// The outcome is observed and logged but never becomes the result of the
/// workflow that issued it.
#[derive(Clone, Debug, PartialEq)]
pub struct Compensation {
    pub host_id: String,
    pub outcome: Result<(), DirectoryError>,
}

impl Compensation {
    pub fn succeeded(&self) -> bool {
        self.outcome.is_ok()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StartReport {
    pub result: AsyncResult,
    /// Identifier generated for this attempt.
    pub host_id: HostId,
    /// Set when the host had been registered but could not be activated.
    pub compensation: Option<Compensation>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StopReport {
    pub result: AsyncResult,
    /// Set when the daemon stopped and a local host id was found.
    pub unregistration: Option<Compensation>,
}

/// Outcome of a journal sweep.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Pending ids that turned out to be the active local host.
    pub kept: Vec<String>,
    /// Orphaned ids removed from the directory.
    pub removed: Vec<String>,
    /// Orphaned ids that could not be removed; still pending.
    pub failed: Vec<String>,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}
