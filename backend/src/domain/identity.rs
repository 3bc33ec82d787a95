//! Turning provider identities into domain users.
//!
//! [`IdentityResolver`] maps one [`AuthIdentity`] to a [`User`], creating a
//! default `author` record the first time an identity is seen.
//! [`SessionResolver`] drives that mapping for a single client session,
//! following the provider's identity signal and publishing the resulting
//! [`SessionState`] over a watch channel.
//!
//! Store failures never block sign-in: the resolver falls back to a
//! non-persisted `author` record, which never carries a higher role than the
//! lowest tier.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use mockable::Clock;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::ports::{AuthProvider, AuthProviderError, UserRepository};
use crate::domain::{
    AuthIdentity, DisplayName, Error, LoginCredentials, LoginValidationError, Role, User,
};

/// Resolves provider identities against the user store.
pub struct IdentityResolver<R: ?Sized> {
    users: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: ?Sized> Clone for IdentityResolver<R> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R: ?Sized> IdentityResolver<R> {
    pub fn new(users: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }
}

impl<R> IdentityResolver<R>
where
    R: UserRepository + ?Sized,
{
    /// Produce the domain user for `identity`. Never fails.
    ///
    /// - A stored user keeps its role, name, and avatar; the sign-in time is
    ///   recorded on a best-effort basis.
    /// - An unknown identity gets a fresh `author` record, persisted through
    ///   an insert that never overwrites a concurrent winner.
    /// - A failed lookup yields the same `author` record without persisting it.
    pub async fn resolve(&self, identity: &AuthIdentity) -> User {
        let now = self.clock.utc();
        match self.users.find_by_id(&identity.uid).await {
            Ok(Some(user)) => {
                if let Err(err) = self.users.touch_last_login(user.id(), now).await {
                    warn!(
                        user_id = %user.id(),
                        kind = err.kind(),
                        error = %err,
                        "failed to record last login"
                    );
                }
                user.with_last_login_at(Some(now))
            }
            Ok(None) => self.provision(identity, now).await,
            Err(err) => {
                warn!(
                    user_id = %identity.uid,
                    kind = err.kind(),
                    error = %err,
                    "user lookup failed; continuing with default role"
                );
                default_user(identity, now)
            }
        }
    }

    async fn provision(&self, identity: &AuthIdentity, now: DateTime<Utc>) -> User {
        let fresh = default_user(identity, now);
        match self.users.insert_if_absent(&fresh).await {
            Ok(stored) => {
                debug!(user_id = %stored.id(), role = %stored.role(), "user provisioned");
                stored
            }
            Err(err) => {
                warn!(
                    user_id = %fresh.id(),
                    kind = err.kind(),
                    error = %err,
                    "failed to persist new user"
                );
                fresh
            }
        }
    }
}

/// Lowest-tier record materialised from what the provider knows.
pub fn default_user(identity: &AuthIdentity, now: DateTime<Utc>) -> User {
    User::new(
        identity.uid.clone(),
        identity.email.clone(),
        identity
            .display_name
            .clone()
            .unwrap_or_else(DisplayName::fallback),
        Role::DEFAULT,
        now,
    )
    .with_avatar(identity.photo_url.clone())
    .with_last_login_at(Some(now))
}

/// Observable state of one client session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No provider signal has been processed yet.
    #[default]
    Unresolved,
    /// Signed out.
    Anonymous,
    /// An identity is being looked up.
    Resolving,
    /// Signed in as the contained user.
    Authenticated(User),
}

impl SessionState {
    /// The signed-in user, if any.
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Per-session state machine bridging the provider and the user store.
///
/// At most one resolution runs at a time. Every signal and every logout
/// bumps a generation counter; a resolution only publishes its result when
/// no newer signal arrived meanwhile, so the latest signal always wins.
pub struct SessionResolver<P: ?Sized, R: ?Sized> {
    provider: Arc<P>,
    identities: IdentityResolver<R>,
    state: watch::Sender<SessionState>,
    in_flight: Mutex<()>,
    generation: AtomicU64,
}

impl<P: ?Sized, R: ?Sized> SessionResolver<P, R> {
    pub fn new(provider: Arc<P>, identities: IdentityResolver<R>) -> Self {
        let (state, _) = watch::channel(SessionState::Unresolved);
        Self {
            provider,
            identities,
            state,
            in_flight: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    /// Observe state transitions.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// The signed-in user, if any.
    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Publish `next` unless a newer signal superseded `generation`.
    fn publish(&self, generation: u64, next: SessionState) -> bool {
        self.state.send_if_modified(|state| {
            if !self.is_current(generation) || *state == next {
                return false;
            }
            *state = next;
            true
        })
    }
}

impl<P, R> SessionResolver<P, R>
where
    P: AuthProvider + ?Sized,
    R: UserRepository + ?Sized,
{
    /// React to a provider identity signal.
    pub async fn handle_identity_change(&self, identity: Option<AuthIdentity>) {
        let generation = self.next_generation();
        self.resolve_signal(generation, identity).await;
    }

    /// Resolve a signal whose generation was taken when it was received.
    ///
    /// Tasks may start in any order; only the newest generation publishes.
    async fn resolve_signal(&self, generation: u64, identity: Option<AuthIdentity>) {
        let _in_flight = self.in_flight.lock().await;
        if !self.is_current(generation) {
            return;
        }
        let Some(identity) = identity else {
            self.publish(generation, SessionState::Anonymous);
            return;
        };
        self.publish(generation, SessionState::Resolving);
        let user = self.identities.resolve(&identity).await;
        if !self.publish(generation, SessionState::Authenticated(user)) {
            debug!(user_id = %identity.uid, "discarded superseded identity resolution");
        }
    }

    /// Verify credentials with the provider.
    ///
    /// Success is reported back through the provider's identity signal; on
    /// failure the session state is left untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), Error> {
        let credentials = parse_credentials(email, password)?;
        let identity = self
            .provider
            .sign_in(&credentials)
            .await
            .map_err(map_provider_error)?;
        debug!(user_id = %identity.uid, "provider accepted credentials");
        Ok(())
    }

    /// Sign out and clear the session. Safe to call repeatedly.
    pub async fn logout(&self) -> Result<(), Error> {
        let generation = self.next_generation();
        self.publish(generation, SessionState::Anonymous);
        self.provider.sign_out().await.map_err(map_provider_error)
    }
}

impl<P, R> SessionResolver<P, R>
where
    P: AuthProvider + ?Sized + 'static,
    R: UserRepository + ?Sized + 'static,
{
    /// Follow the provider's identity signal until the provider goes away.
    ///
    /// Each signal is handled on its own task so a newer signal can
    /// supersede a resolution that is still running.
    pub async fn run(self: Arc<Self>) {
        let mut changes = self.provider.identity_changes();
        loop {
            let identity = changes.borrow_and_update().clone();
            let generation = self.next_generation();
            let this = Arc::clone(&self);
            tokio::spawn(async move { this.resolve_signal(generation, identity).await });
            if changes.changed().await.is_err() {
                break;
            }
        }
    }

    /// Spawn [`run`](Self::run) on the current runtime.
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(Arc::clone(self).run())
    }
}

/// Validate raw credentials, reporting the offending field.
pub(crate) fn parse_credentials(email: &str, password: &str) -> Result<LoginCredentials, Error> {
    LoginCredentials::try_from_parts(email, password).map_err(map_login_validation_error)
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    let (field, code) = match &err {
        LoginValidationError::InvalidEmail(_) => ("email", "invalid_email"),
        LoginValidationError::EmptyPassword => ("password", "empty_password"),
    };
    Error::invalid_request(err.to_string())
        .with_details(serde_json::json!({ "field": field, "code": code }))
}

pub(crate) fn map_provider_error(err: AuthProviderError) -> Error {
    match err {
        AuthProviderError::InvalidCredentials { message } => Error::unauthorized(message),
        AuthProviderError::Unavailable { message } => {
            Error::service_unavailable(format!("authentication provider unavailable: {message}"))
        }
    }
}
