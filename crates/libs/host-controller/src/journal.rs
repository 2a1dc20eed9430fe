use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum JournalError {
    #[error("journal i/o error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("journal at {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to encode journal: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("journal task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Host ids whose directory registration may not have a running daemon yet.
///
/// An id is recorded before the directory is asked to register it and
/// cleared once the host is running or the registration has been removed
/// again. Whatever survives a crash is swept by
/// [`crate::HostController::reconcile`].
#[async_trait]
pub trait RegistrationJournal: Send + Sync {
    async fn record_pending(&self, host_id: &str) -> Result<(), JournalError>;

    async fn clear(&self, host_id: &str) -> Result<(), JournalError>;

    async fn pending(&self) -> Result<Vec<String>, JournalError>;
}

/// Keeps nothing. Orphaned registrations are then only cleaned up when the
/// failure is seen while the start is still running.
pub struct NoJournal;

#[async_trait]
impl RegistrationJournal for NoJournal {
    async fn record_pending(&self, _host_id: &str) -> Result<(), JournalError> {
        Ok(())
    }

    async fn clear(&self, _host_id: &str) -> Result<(), JournalError> {
        Ok(())
    }

    async fn pending(&self) -> Result<Vec<String>, JournalError> {
        Ok(Vec::new())
    }
}

/// In-process journal. Survives failed starts, not process exit.
#[derive(Default)]
pub struct MemoryJournal {
    pending: Mutex<BTreeSet<String>>,
}

impl MemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RegistrationJournal for MemoryJournal {
    async fn record_pending(&self, host_id: &str) -> Result<(), JournalError> {
        self.pending
            .lock()
            .expect("journal mutex poisoned")
            .insert(host_id.to_string());
        Ok(())
    }

    async fn clear(&self, host_id: &str) -> Result<(), JournalError> {
        self.pending
            .lock()
            .expect("journal mutex poisoned")
            .remove(host_id);
        Ok(())
    }

    async fn pending(&self) -> Result<Vec<String>, JournalError> {
        Ok(self
            .pending
            .lock()
            .expect("journal mutex poisoned")
            .iter()
            .cloned()
            .collect())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct JournalFile {
    #[serde(default)]
    pending: BTreeSet<String>,
}

/// TOML-backed journal. Every change rewrites the file atomically.
///
/// File access runs on the blocking pool; the async lock keeps
/// read-modify-write cycles from interleaving.
pub struct FileJournal {
    path: PathBuf,
    lock: tokio::sync::Mutex<()>,
}

impl FileJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn update<F>(&self, apply: F) -> Result<(), JournalError>
    where
        F: FnOnce(&mut BTreeSet<String>) -> bool + Send + 'static,
    {
        let _guard = self.lock.lock().await;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let mut journal = load(&path)?;
            if apply(&mut journal.pending) {
                store(&path, &journal)?;
            }
            Ok::<(), JournalError>(())
        })
        .await?
    }
}

#[async_trait]
impl RegistrationJournal for FileJournal {
    async fn record_pending(&self, host_id: &str) -> Result<(), JournalError> {
        let host_id = host_id.to_string();
        self.update(move |pending| pending.insert(host_id)).await
    }

    async fn clear(&self, host_id: &str) -> Result<(), JournalError> {
        let host_id = host_id.to_string();
        self.update(move |pending| pending.remove(&host_id)).await
    }

    async fn pending(&self) -> Result<Vec<String>, JournalError> {
        let _guard = self.lock.lock().await;
        let path = self.path.clone();
        let journal = tokio::task::spawn_blocking(move || load(&path)).await??;
        Ok(journal.pending.into_iter().collect())
    }
}

fn load(path: &Path) -> Result<JournalFile, JournalError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(JournalFile::default()),
        Err(source) => {
            return Err(JournalError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    toml::from_str(&contents).map_err(|source| JournalError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

fn store(path: &Path, journal: &JournalFile) -> Result<(), JournalError> {
    let encoded = toml::to_string_pretty(journal)?;
    write_atomically(path, encoded.as_bytes()).map_err(|source| JournalError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let unique = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
    let tmp_path = path.with_extension(format!("tmp-{unique}"));
    {
        let mut file = fs::OpenOptions::new().write(true).create_new(true).open(&tmp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }

    #[cfg(windows)]
    if path.exists() {
        let _ = fs::remove_file(path);
    }

    fs::rename(&tmp_path, path)
}
