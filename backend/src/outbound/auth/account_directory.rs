//! Email and password accounts held in memory.

use std::collections::HashMap;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use zeroize::Zeroizing;

use crate::domain::ports::{AuthProviderError, CredentialVerifier};
use crate::domain::{AuthIdentity, DisplayName, Email, LoginCredentials, UserId};

const INVALID_CREDENTIALS: &str = "invalid email or password";

/// Account registration input.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: Email,
    pub password: Zeroizing<String>,
    pub display_name: Option<DisplayName>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone)]
struct Account {
    uid: UserId,
    email: Email,
    digest: String,
    display_name: Option<DisplayName>,
    photo_url: Option<String>,
}

impl Account {
    fn identity(&self) -> AuthIdentity {
        let mut identity = AuthIdentity::new(self.uid.clone()).with_email(self.email.clone());
        if let Some(name) = &self.display_name {
            identity = identity.with_display_name(name.clone());
        }
        if let Some(url) = &self.photo_url {
            identity = identity.with_photo_url(url.clone());
        }
        identity
    }
}

/// Credential store keyed by normalised email.
#[derive(Debug, Default)]
pub struct AccountDirectory {
    accounts: RwLock<HashMap<Email, Account>>,
}

impl AccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account, or reset the password and profile of an
    /// existing one. The identity key of an existing account is kept.
    pub async fn register(&self, account: NewAccount) -> UserId {
        let mut accounts = self.accounts.write().await;
        let uid = accounts
            .get(&account.email)
            .map_or_else(UserId::random, |existing| existing.uid.clone());
        let digest = password_digest(&uid, &account.password);
        accounts.insert(
            account.email.clone(),
            Account {
                uid: uid.clone(),
                email: account.email,
                digest,
                display_name: account.display_name,
                photo_url: account.photo_url,
            },
        );
        uid
    }
}

#[async_trait]
impl CredentialVerifier for AccountDirectory {
    async fn verify(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthIdentity, AuthProviderError> {
        let accounts = self.accounts.read().await;
        let account = accounts
            .get(credentials.email())
            .ok_or_else(|| AuthProviderError::invalid_credentials(INVALID_CREDENTIALS))?;
        if password_digest(&account.uid, credentials.password()) != account.digest {
            return Err(AuthProviderError::invalid_credentials(INVALID_CREDENTIALS));
        }
        Ok(account.identity())
    }
}

/// Hex SHA-256 of the password salted with the identity key.
fn password_digest(uid: &UserId, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(uid.as_ref().as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
