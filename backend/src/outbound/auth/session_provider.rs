//! One client session against a [`CredentialVerifier`].

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::debug;

use crate::domain::ports::{AuthProvider, AuthProviderError, CredentialVerifier};
use crate::domain::{AuthIdentity, LoginCredentials};

/// [`AuthProvider`] that keeps the signed-in identity for a single session.
pub struct DirectorySessionProvider {
    verifier: Arc<dyn CredentialVerifier>,
    identity: watch::Sender<Option<AuthIdentity>>,
}

impl DirectorySessionProvider {
    /// Signed-out session checking credentials against `verifier`.
    pub fn new(verifier: Arc<dyn CredentialVerifier>) -> Self {
        let (identity, _) = watch::channel(None);
        Self { verifier, identity }
    }
}

#[async_trait]
impl AuthProvider for DirectorySessionProvider {
    async fn sign_in(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthIdentity, AuthProviderError> {
        let identity = self.verifier.verify(credentials).await?;
        debug!(user_id = %identity.uid, "session signed in");
        self.identity.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthProviderError> {
        self.identity.send_if_modified(|current| current.take().is_some());
        Ok(())
    }

    fn identity_changes(&self) -> watch::Receiver<Option<AuthIdentity>> {
        self.identity.subscribe()
    }
}
