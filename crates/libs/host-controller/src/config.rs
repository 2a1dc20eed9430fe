use std::fs;
use std::path::{Path, PathBuf};

use host_directory::DirectorySettings;
use serde::{Deserialize, Serialize};

/// Controller settings, usually read from a TOML file.
///
/// ```toml
/// single_flight = true
///
/// [directory]
/// api_base_url = "https://www.googleapis.com/chromoting/v1"
/// connect_timeout_secs = 5
/// read_timeout_secs = 30
///
/// [journal]
/// path = "/var/lib/remoting/pending-registrations.toml"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ControllerConfig {
    /// Serialize start/stop/update-pin/reconcile per controller.
    pub single_flight: bool,
    pub directory: DirectorySettings,
    pub journal: JournalSettings,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            single_flight: true,
            directory: DirectorySettings::default(),
            journal: JournalSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct JournalSettings {
    /// Without a path no registration journal is kept.
    pub path: Option<PathBuf>,
}

impl ControllerConfig {
    pub fn from_toml(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, std::io::Error> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    }
}
