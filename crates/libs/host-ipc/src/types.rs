use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ── Wire enums ────────────────────────────────────────────────────────────────
//
// Integer values are shared with daemon_controller.h. Never renumber one side
// without the other.

pub mod state_code {
    pub const NOT_IMPLEMENTED: i32 = -1;
    pub const NOT_INSTALLED: i32 = 0;
    pub const INSTALLING: i32 = 1;
    pub const STOPPED: i32 = 2;
    pub const STARTING: i32 = 3;
    pub const STARTED: i32 = 4;
    pub const STOPPING: i32 = 5;
    pub const UNKNOWN: i32 = 6;
}

pub mod result_code {
    pub const OK: i32 = 0;
    pub const FAILED: i32 = 1;
    pub const CANCELLED: i32 = 2;
    pub const FAILED_DIRECTORY: i32 = 3;
}

/// State of the local host daemon as reported by Daemon Control.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "i32", into = "i32")]
#[repr(i32)]
pub enum DaemonState {
    NotImplemented = state_code::NOT_IMPLEMENTED,
    NotInstalled = state_code::NOT_INSTALLED,
    Installing = state_code::INSTALLING,
    Stopped = state_code::STOPPED,
    Starting = state_code::STARTING,
    Started = state_code::STARTED,
    Stopping = state_code::STOPPING,
    Unknown = state_code::UNKNOWN,
}

impl DaemonState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotImplemented => "not_implemented",
            Self::NotInstalled => "not_installed",
            Self::Installing => "installing",
            Self::Stopped => "stopped",
            Self::Starting => "starting",
            Self::Started => "started",
            Self::Stopping => "stopping",
            Self::Unknown => "unknown",
        }
    }
}

impl TryFrom<i32> for DaemonState {
    type Error = UnknownCode;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            state_code::NOT_IMPLEMENTED => Ok(Self::NotImplemented),
            state_code::NOT_INSTALLED => Ok(Self::NotInstalled),
            state_code::INSTALLING => Ok(Self::Installing),
            state_code::STOPPED => Ok(Self::Stopped),
            state_code::STARTING => Ok(Self::Starting),
            state_code::STARTED => Ok(Self::Started),
            state_code::STOPPING => Ok(Self::Stopping),
            state_code::UNKNOWN => Ok(Self::Unknown),
            other => Err(UnknownCode { kind: "daemon state", code: other }),
        }
    }
}

impl From<DaemonState> for i32 {
    fn from(state: DaemonState) -> Self {
        state as i32
    }
}

/// Outcome of every mutating workflow.
///
/// `FailedDirectory` is kept apart from `Failed` because the caller shows a
/// different message when the remote registry, not the local daemon, failed.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "i32", into = "i32")]
#[repr(i32)]
pub enum AsyncResult {
    Ok = result_code::OK,
    Failed = result_code::FAILED,
    Cancelled = result_code::CANCELLED,
    FailedDirectory = result_code::FAILED_DIRECTORY,
}

impl AsyncResult {
    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::FailedDirectory => "failed_directory",
        }
    }
}

impl TryFrom<i32> for AsyncResult {
    type Error = UnknownCode;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            result_code::OK => Ok(Self::Ok),
            result_code::FAILED => Ok(Self::Failed),
            result_code::CANCELLED => Ok(Self::Cancelled),
            result_code::FAILED_DIRECTORY => Ok(Self::FailedDirectory),
            other => Err(UnknownCode { kind: "async result", code: other }),
        }
    }
}

impl From<AsyncResult> for i32 {
    fn from(result: AsyncResult) -> Self {
        result as i32
    }
}

/// An integer that does not belong to the pinned daemon contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} code {code}")]
pub struct UnknownCode {
    pub kind: &'static str,
    pub code: i32,
}

// ── Host configuration ────────────────────────────────────────────────────────

pub const HOST_ID_KEY: &str = "host_id";
pub const XMPP_LOGIN_KEY: &str = "xmpp_login";

/// The local host configuration exactly as the daemon returns it.
///
/// Fields are untyped JSON: the daemon may hand back a partial or malformed
/// record and readers must cope with that.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ConfigRecord {
    pub values: BTreeMap<String, JsonValue>,
}

impl ConfigRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// String value of `key`, or `None` when absent or not a string.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(JsonValue::as_str)
    }
}

/// Full host configuration written by a successful registration.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HostConfiguration {
    pub xmpp_login: String,
    pub oauth_refresh_token: String,
    pub host_id: String,
    pub host_name: String,
    pub host_secret_hash: String,
    pub private_key: String,
}

impl HostConfiguration {
    /// Render as the untyped record the daemon stores.
    pub fn to_record(&self) -> ConfigRecord {
        ConfigRecord::new()
            .with(XMPP_LOGIN_KEY, self.xmpp_login.as_str())
            .with("oauth_refresh_token", self.oauth_refresh_token.as_str())
            .with(HOST_ID_KEY, self.host_id.as_str())
            .with("host_name", self.host_name.as_str())
            .with("host_secret_hash", self.host_secret_hash.as_str())
            .with("private_key", self.private_key.as_str())
    }
}

/// Partial configuration update. `None` fields are left untouched.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HostConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_secret_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_refresh_token: Option<String>,
}

impl HostConfigPatch {
    pub fn pin_hash(host_secret_hash: impl Into<String>) -> Self {
        Self {
            host_secret_hash: Some(host_secret_hash.into()),
            ..Self::default()
        }
    }
}

// ── Credentials and consent ───────────────────────────────────────────────────

/// Key pair generated by the daemon for a single registration.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeyPair {
    pub private_key: String,
    pub public_key: String,
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("private_key", &"<redacted>")
            .field("public_key", &self.public_key)
            .finish()
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UsageStatsConsent {
    pub supported: bool,
    pub allowed: bool,
    pub set_by_policy: bool,
}

// ── Directory ─────────────────────────────────────────────────────────────────

/// What the directory needs to publish a host.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HostRegistration {
    pub host_id: String,
    pub host_name: String,
    pub public_key: String,
}

/// Successful directory answer.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegistrationStatus {
    pub status_code: u16,
}
