mod daemon;
mod directory;
mod identity;

pub use daemon::{DaemonConfigStore, DaemonConsent, DaemonCredentials, DaemonLifecycle};
pub use directory::{DirectoryClient, HostListObserver};
pub use identity::IdentityProvider;

/// Composite trait encompassing every Daemon Control capability.
///
/// Automatically implemented for any type that implements all four
/// sub-traits. Use `Arc<dyn DaemonControl>` as the primary handle type.
pub trait DaemonControl: DaemonLifecycle + DaemonConfigStore + DaemonCredentials + DaemonConsent {}

impl<T> DaemonControl for T where T: DaemonLifecycle + DaemonConfigStore + DaemonCredentials + DaemonConsent {}
