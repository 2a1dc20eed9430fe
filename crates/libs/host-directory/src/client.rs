use std::sync::Arc;

use async_trait::async_trait;
use host_ipc::{
    DirectoryClient, DirectoryError, HostRegistration, IdentityProvider, RegistrationStatus,
};
use serde::Serialize;

use crate::settings::DirectorySettings;
use crate::transport::{summarize_transport_error, truncate_body};

const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";
const MAX_LOGGED_BODY: usize = 512;

#[derive(Serialize)]
struct RegistrationEnvelope<'a> {
    data: &'a HostRegistration,
}

/// Directory client speaking the `/@me/hosts` REST API.
pub struct HttpDirectoryClient {
    base_url: String,
    agent: ureq::Agent,
    identity: Arc<dyn IdentityProvider>,
}

impl HttpDirectoryClient {
    /// `identity` supplies the token for unregistration, which callers issue
    /// without one.
    pub fn new(settings: &DirectorySettings, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            base_url: settings.base_url().to_string(),
            agent: ureq::AgentBuilder::new()
                .timeout_connect(settings.connect_timeout())
                .timeout_read(settings.read_timeout())
                .timeout_write(settings.read_timeout())
                .build(),
            identity,
        }
    }

    pub fn hosts_url(&self) -> String {
        format!("{}/@me/hosts/", self.base_url)
    }

    pub fn host_url(&self, host_id: &str) -> String {
        format!("{}/@me/hosts/{}", self.base_url, host_id)
    }
}

#[async_trait]
impl DirectoryClient for HttpDirectoryClient {
    async fn register_host(
        &self,
        registration: &HostRegistration,
        auth_token: &str,
    ) -> Result<RegistrationStatus, DirectoryError> {
        let url = self.hosts_url();
        let body = serde_json::to_string(&RegistrationEnvelope { data: registration })
            .map_err(|err| DirectoryError::Transport {
                message: format!("failed to encode registration: {err}"),
            })?;
        let authorization = format!("OAuth {auth_token}");
        let agent = self.agent.clone();

        log::debug!("directory: registering host {}", registration.host_id);
        let status_code = send_blocking(move || {
            agent
                .post(&url)
                .set("Authorization", &authorization)
                .set("Content-Type", JSON_CONTENT_TYPE)
                .send_string(&body)
        })
        .await
        .map_err(|err| {
            log::warn!("directory: failed to register host {}: {err}", registration.host_id);
            err
        })?;

        Ok(RegistrationStatus { status_code })
    }

    async fn unregister_host(&self, host_id: &str) -> Result<(), DirectoryError> {
        let token = self
            .identity
            .auth_token()
            .await
            .map_err(|err| DirectoryError::Unauthorized {
                reason: err.to_string(),
            })?;
        let url = self.host_url(host_id);
        let authorization = format!("OAuth {token}");
        let agent = self.agent.clone();

        log::debug!("directory: unregistering host {host_id}");
        send_blocking(move || {
            agent
                .delete(&url)
                .set("Authorization", &authorization)
                .call()
        })
        .await?;
        Ok(())
    }
}

async fn send_blocking<F>(request: F) -> Result<u16, DirectoryError>
where
    F: FnOnce() -> Result<ureq::Response, ureq::Error> + Send + 'static,
{
    let outcome = tokio::task::spawn_blocking(move || match request() {
        Ok(response) => Ok(response.status()),
        Err(ureq::Error::Status(status, response)) => {
            let body = response.into_string().unwrap_or_default();
            Err(status_error(status, truncate_body(body, MAX_LOGGED_BODY)))
        }
        Err(ureq::Error::Transport(transport)) => Err(DirectoryError::Transport {
            message: summarize_transport_error(&transport),
        }),
    })
    .await
    .map_err(|err| DirectoryError::Transport {
        message: format!("directory request task failed: {err}"),
    })?;

    let status = outcome?;
    if !(200..300).contains(&status) {
        return Err(status_error(status, String::new()));
    }
    Ok(status)
}

fn status_error(status: u16, body: String) -> DirectoryError {
    match status {
        401 | 403 => DirectoryError::Unauthorized {
            reason: format!("http status {status}"),
        },
        _ => DirectoryError::Rejected { status, body },
    }
}
