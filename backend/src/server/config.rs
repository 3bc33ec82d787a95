//! Server settings loaded via OrthoConfig, and the validated configuration
//! handed to [`super::create_server`].

use std::net::{AddrParseError, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;
use zeroize::Zeroizing;

use portfolio_cms::domain::{DisplayName, Email, UserValidationError};
use portfolio_cms::inbound::http::session_config::SessionSettings;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_MEDIA_BASE_URL: &str = "http://localhost:8080/media/";

/// Raw settings read from `CMS_*` environment variables, config files, and
/// command-line flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CMS")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Public base URL media content is served from.
    pub media_base_url: Option<String>,
    /// Email of the admin account seeded at startup.
    pub bootstrap_admin_email: Option<String>,
    /// Password of the seeded admin account.
    pub bootstrap_admin_password: Option<String>,
    /// Display name of the seeded admin.
    pub bootstrap_admin_name: Option<String>,
}

/// Rejected server settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {source}")]
    BindAddr {
        value: String,
        #[source]
        source: AddrParseError,
    },
    #[error("invalid media base URL {value:?}: {source}")]
    MediaBaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("media base URL {value:?} cannot carry path segments")]
    OpaqueMediaBaseUrl { value: String },
    #[error("bootstrap admin needs both an email and a password")]
    IncompleteBootstrap,
    #[error("invalid bootstrap admin: {0}")]
    BootstrapAdmin(#[from] UserValidationError),
}

/// Admin account created on first boot.
pub struct BootstrapAdmin {
    pub email: Email,
    pub password: Zeroizing<String>,
    pub name: Option<DisplayName>,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    pub fn media_base_url(&self) -> Result<Url, SettingsError> {
        let value = self
            .media_base_url
            .as_deref()
            .unwrap_or(DEFAULT_MEDIA_BASE_URL);
        let url = Url::parse(value).map_err(|source| SettingsError::MediaBaseUrl {
            value: value.to_owned(),
            source,
        })?;
        if url.cannot_be_a_base() {
            return Err(SettingsError::OpaqueMediaBaseUrl {
                value: value.to_owned(),
            });
        }
        Ok(url)
    }

    /// Admin to seed, if one is configured.
    ///
    /// Setting only one of email and password is an error so a typo cannot
    /// silently leave the system without an administrator.
    pub fn bootstrap_admin(&self) -> Result<Option<BootstrapAdmin>, SettingsError> {
        match (
            self.bootstrap_admin_email.as_deref(),
            self.bootstrap_admin_password.as_deref(),
        ) {
            (None, None) => Ok(None),
            (Some(email), Some(password)) if !password.is_empty() => {
                let name = self
                    .bootstrap_admin_name
                    .as_deref()
                    .map(DisplayName::new)
                    .transpose()?;
                Ok(Some(BootstrapAdmin {
                    email: Email::new(email)?,
                    password: Zeroizing::new(password.to_owned()),
                    name,
                }))
            }
            _ => Err(SettingsError::IncompleteBootstrap),
        }
    }
}

/// Validated configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) media_base_url: Url,
    pub(crate) bootstrap_admin: Option<BootstrapAdmin>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr, media_base_url: Url) -> Self {
        Self {
            session,
            bind_addr,
            media_base_url,
            bootstrap_admin: None,
        }
    }

    #[must_use]
    pub fn with_bootstrap_admin(mut self, admin: Option<BootstrapAdmin>) -> Self {
        self.bootstrap_admin = admin;
        self
    }

    /// Validate `settings` and combine them with the session settings.
    pub fn from_settings(
        settings: &ServerSettings,
        session: SessionSettings,
    ) -> Result<Self, SettingsError> {
        Ok(
            Self::new(session, settings.bind_addr()?, settings.media_base_url()?)
                .with_bootstrap_admin(settings.bootstrap_admin()?),
        )
    }
}
