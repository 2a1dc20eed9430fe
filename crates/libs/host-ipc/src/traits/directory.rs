use async_trait::async_trait;

use crate::error::DirectoryError;
use crate::types::{HostRegistration, RegistrationStatus};

/// Remote host registry.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Publish a new host. Anything other than a 2xx answer is an error.
    async fn register_host(
        &self,
        registration: &HostRegistration,
        auth_token: &str,
    ) -> Result<RegistrationStatus, DirectoryError>;

    /// Delete the host record for `host_id`. Callers treat this as best
    /// effort; the implementation obtains its own credentials.
    async fn unregister_host(&self, host_id: &str) -> Result<(), DirectoryError>;
}

/// Receives host list changes caused by the controller.
pub trait HostListObserver: Send + Sync {
    /// A freshly registered local host is up and running.
    fn on_local_host_started(&self, host_name: &str, host_id: &str, public_key: &str);
}
