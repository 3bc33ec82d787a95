//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and only see domain
//! services and ports, so they stay testable without real infrastructure.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    ArticleRepository, CredentialVerifier, MediaRepository, PageRepository, UserRepository,
};
use crate::domain::{
    ArticleService, IdentityResolver, MediaService, PageService, UserAdminService,
};

/// Parameter object bundling the driven ports the HTTP adapter needs.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub articles: Arc<dyn ArticleRepository>,
    pub pages: Arc<dyn PageRepository>,
    pub media: Arc<dyn MediaRepository>,
    pub users: Arc<dyn UserRepository>,
    pub credentials: Arc<dyn CredentialVerifier>,
    pub clock: Arc<dyn Clock>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub articles: Arc<ArticleService<dyn ArticleRepository>>,
    pub pages: Arc<PageService<dyn PageRepository>>,
    pub media: Arc<MediaService<dyn MediaRepository>>,
    pub user_admin: Arc<UserAdminService<dyn UserRepository>>,
    pub identities: IdentityResolver<dyn UserRepository>,
    /// Used to re-load the acting user on every request.
    pub users: Arc<dyn UserRepository>,
    pub credentials: Arc<dyn CredentialVerifier>,
}

impl HttpState {
    /// Wire the domain services over `ports`.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            articles,
            pages,
            media,
            users,
            credentials,
            clock,
        } = ports;
        Self {
            articles: Arc::new(ArticleService::new(articles, Arc::clone(&clock))),
            pages: Arc::new(PageService::new(pages, Arc::clone(&clock))),
            media: Arc::new(MediaService::new(media, Arc::clone(&clock))),
            user_admin: Arc::new(UserAdminService::new(Arc::clone(&users))),
            identities: IdentityResolver::new(Arc::clone(&users), clock),
            users,
            credentials,
        }
    }
}
