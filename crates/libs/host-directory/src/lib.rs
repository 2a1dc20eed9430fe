//! HTTP adapter for the remote host directory.
//!
//! [`HttpDirectoryClient`] implements [`host_ipc::DirectoryClient`] against
//! the directory REST API. Requests are plain JSON over `ureq`; the blocking
//! calls are moved onto the tokio blocking pool so the controller's pipeline
//! never blocks its executor.

mod client;
mod settings;
mod transport;

pub use client::HttpDirectoryClient;
pub use settings::{DirectorySettings, DEFAULT_API_BASE_URL};
