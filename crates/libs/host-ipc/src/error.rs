use serde::{Deserialize, Serialize};

/// Errors returned by Daemon Control operations.
///
/// `NotImplemented` is what [`crate::StubDaemon`] returns for every method;
/// `Unavailable` is what [`crate::DaemonDispatcher`] returns when the daemon
/// interface itself could not be created.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum DaemonError {
    #[error("not implemented: {method}")]
    NotImplemented { method: String },

    #[error("unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("internal error: {message}")]
    Internal { message: String },

    #[error("transport error: {message}")]
    Transport { message: String },
}

impl DaemonError {
    /// Returns `true` for transient errors that may succeed on retry.
    ///
    /// The controller never retries on its own; this is for callers.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::Transport { .. })
    }

    /// Convenience constructor for `NotImplemented`.
    pub fn not_implemented(method: impl Into<String>) -> Self {
        Self::NotImplemented {
            method: method.into(),
        }
    }

    /// Convenience constructor for `Unavailable`.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

/// Errors returned by the remote host directory.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum DirectoryError {
    /// The directory answered with a non-success status.
    #[error("directory rejected request: http status {status}")]
    Rejected { status: u16, body: String },

    /// The directory refused the bearer token, or none could be obtained.
    #[error("directory authorization failed: {reason}")]
    Unauthorized { reason: String },

    /// The directory could not be reached or did not answer with HTTP.
    #[error("directory transport error: {message}")]
    Transport { message: String },
}

impl DirectoryError {
    /// HTTP status reported by the directory, if it answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Unauthorized { .. } | Self::Transport { .. } => None,
        }
    }
}

/// Errors returned by the identity provider.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum IdentityError {
    #[error("no auth token available: {reason}")]
    NoToken { reason: String },

    #[error("identity transport error: {message}")]
    Transport { message: String },
}
