use async_trait::async_trait;

use crate::error::IdentityError;

/// The signed-in account.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// A currently valid OAuth access token.
    async fn auth_token(&self) -> Result<String, IdentityError>;

    /// Account email remembered from the last sign-in.
    fn cached_email(&self) -> String;

    /// Refresh token handed to the daemon so it can authenticate by itself.
    fn export_refresh_token(&self) -> String;
}
