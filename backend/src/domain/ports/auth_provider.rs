//! Ports for the external authentication provider.
//!
//! [`AuthProvider`] models one signed-in client session: it accepts
//! credentials, revokes the session, and pushes identity transitions over a
//! watch channel. [`CredentialVerifier`] is the stateless counterpart used
//! by request/response adapters that keep their own session cookie.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::domain::{AuthIdentity, LoginCredentials};

use super::define_port_error;

define_port_error! {
    /// Errors raised by authentication provider adapters.
    pub enum AuthProviderError {
        /// The provider rejected the credentials.
        InvalidCredentials { message: String } => "{message}",
        /// The provider could not be reached.
        Unavailable { message: String } => "authentication provider unavailable: {message}",
    }
}

/// Per-session authentication provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Verify credentials and sign the session in.
    ///
    /// On success the new identity is also published on
    /// [`identity_changes`](AuthProvider::identity_changes).
    async fn sign_in(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthIdentity, AuthProviderError>;

    /// Revoke the session. Signing out twice is not an error.
    async fn sign_out(&self) -> Result<(), AuthProviderError>;

    /// Subscribe to identity transitions; `None` means signed out.
    fn identity_changes(&self) -> watch::Receiver<Option<AuthIdentity>>;
}

/// Stateless credential check.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Return the identity behind the credentials.
    async fn verify(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthIdentity, AuthProviderError>;
}
