//! Interface boundary for the remoting host controller.
//!
//! This crate defines the contract between the host lifecycle controller and
//! the collaborators it orchestrates. It provides:
//!
//! - **Wire enums** ([`DaemonState`], [`AsyncResult`]) whose integer values
//!   are shared with the native daemon and must never be renumbered
//! - **The configuration record** as the daemon returns it, plus the typed
//!   full and partial forms the controller writes
//! - **Async trait definitions** for every collaborator
//! - **`StubDaemon`** returning `NotImplemented` for every method
//! - **`DaemonDispatcher`** absorbing daemon construction failures
//!
//! # Trait hierarchy
//!
//! Four focused daemon traits combine into one composite:
//!
//! - [`DaemonLifecycle`]: state, version, start, stop
//! - [`DaemonConfigStore`]: read and patch the local host configuration
//! - [`DaemonCredentials`]: key pairs, PIN hashes, machine name
//! - [`DaemonConsent`]: usage statistics / crash reporting consent
//! - [`DaemonControl`]: composite (auto-implemented for all four)
//!
//! The remote side is covered by [`DirectoryClient`] and [`IdentityProvider`];
//! [`HostListObserver`] receives the "local host started" notification.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{DaemonError, DirectoryError, IdentityError};
pub use traits::{
    DaemonConfigStore, DaemonConsent, DaemonControl, DaemonCredentials, DaemonLifecycle,
    DirectoryClient, HostListObserver, IdentityProvider,
};
pub use types::*;

mod dispatcher;
mod stub;
pub use dispatcher::DaemonDispatcher;
pub use stub::StubDaemon;
