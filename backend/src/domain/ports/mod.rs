//! Driven ports for the hexagonal boundary.
//!
//! Services depend on these traits only; adapters under `outbound` supply
//! the implementations.

mod macros;
pub(crate) use macros::define_port_error;

mod article_repository;
mod auth_provider;
mod media_repository;
mod page_repository;
mod user_repository;

#[cfg(test)]
pub use article_repository::MockArticleRepository;
pub use article_repository::{ArticleRepository, ArticleRepositoryError};
#[cfg(test)]
pub use auth_provider::{MockAuthProvider, MockCredentialVerifier};
pub use auth_provider::{AuthProvider, AuthProviderError, CredentialVerifier};
#[cfg(test)]
pub use media_repository::MockMediaRepository;
pub use media_repository::{MediaRepository, MediaRepositoryError};
#[cfg(test)]
pub use page_repository::MockPageRepository;
pub use page_repository::{PageRepository, PageRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
