//! Builders wiring the in-memory adapters behind the HTTP state.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::info;
use url::Url;

use portfolio_cms::domain::ports::UserRepository;
use portfolio_cms::domain::{DisplayName, Role, User, UserChanges};
use portfolio_cms::inbound::http::state::{HttpState, HttpStatePorts};
use portfolio_cms::outbound::auth::{AccountDirectory, NewAccount};
use portfolio_cms::outbound::memory::{
    MemoryArticleStore, MemoryMediaStore, MemoryPageStore, MemoryUserStore,
};

use super::config::BootstrapAdmin;

/// Adapters shared by every worker.
pub(crate) struct Adapters {
    pub(crate) users: Arc<MemoryUserStore>,
    pub(crate) directory: Arc<AccountDirectory>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) state: HttpState,
}

/// Build the HTTP state over fresh in-memory stores.
pub(crate) fn build_adapters(media_base_url: Url, clock: Arc<dyn Clock>) -> Adapters {
    let users = Arc::new(MemoryUserStore::new());
    let directory = Arc::new(AccountDirectory::new());
    let state = HttpState::new(HttpStatePorts {
        articles: Arc::new(MemoryArticleStore::new()),
        pages: Arc::new(MemoryPageStore::new()),
        media: Arc::new(MemoryMediaStore::new(media_base_url)),
        users: Arc::clone(&users) as Arc<dyn UserRepository>,
        credentials: Arc::clone(&directory) as _,
        clock: Arc::clone(&clock),
    });
    Adapters {
        users,
        directory,
        clock,
        state,
    }
}

/// Production adapters using the system clock.
pub(crate) fn build_default_adapters(media_base_url: Url) -> Adapters {
    build_adapters(media_base_url, Arc::new(DefaultClock))
}

/// Register the bootstrap admin's account and store an `admin` user record
/// for it. An existing record keeps its data but is promoted to admin.
pub(crate) async fn seed_bootstrap_admin(
    adapters: &Adapters,
    admin: BootstrapAdmin,
) -> std::io::Result<User> {
    let BootstrapAdmin {
        email,
        password,
        name,
    } = admin;
    let uid = adapters
        .directory
        .register(NewAccount {
            email: email.clone(),
            password,
            display_name: name.clone(),
            photo_url: None,
        })
        .await;
    let candidate = User::new(
        uid,
        Some(email),
        name.unwrap_or_else(DisplayName::fallback),
        Role::Admin,
        adapters.clock.utc(),
    );
    let mut stored = adapters
        .users
        .insert_if_absent(&candidate)
        .await
        .map_err(|error| std::io::Error::other(format!("seed bootstrap admin: {error}")))?;
    if stored.role() != Role::Admin {
        stored.apply(&UserChanges {
            role: Some(Role::Admin),
            ..Default::default()
        });
        adapters
            .users
            .replace(&stored)
            .await
            .map_err(|error| std::io::Error::other(format!("promote bootstrap admin: {error}")))?;
    }
    info!(user_id = %stored.id(), "bootstrap admin ready");
    Ok(stored)
}
