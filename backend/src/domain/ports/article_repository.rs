//! Port for article persistence.

use async_trait::async_trait;

use crate::domain::{Article, DocumentId, NewArticle, Slug};

use super::define_port_error;

define_port_error! {
    /// Errors raised by article repository adapters.
    pub enum ArticleRepositoryError {
        /// Store could not be reached.
        Connection { message: String } => "article repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "article repository query failed: {message}",
        /// No article exists under the given id.
        Missing { id: String } => "article {id} does not exist",
        /// Another article already uses the slug.
        DuplicateSlug { slug: String } => "article slug {slug} is already taken",
    }
}

/// Document store for articles.
///
/// Adapters serialise writes per document; there is no optimistic
/// concurrency, so the last writer wins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Every stored article, in no particular order.
    async fn list(&self) -> Result<Vec<Article>, ArticleRepositoryError>;

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Article>, ArticleRepositoryError>;

    /// First article whose slug matches exactly.
    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Article>, ArticleRepositoryError>;

    /// Assign an id and store the record with zero views.
    ///
    /// Fails with [`ArticleRepositoryError::DuplicateSlug`] when the slug is
    /// already used; the check and the write are atomic.
    async fn insert(&self, article: NewArticle) -> Result<Article, ArticleRepositoryError>;

    /// Overwrite an existing record.
    ///
    /// The stored view counter is kept regardless of `article.views`.
    /// Returns [`ArticleRepositoryError::Missing`] when the id is unknown.
    async fn replace(&self, article: &Article) -> Result<Article, ArticleRepositoryError>;

    /// Remove a record. Returns [`ArticleRepositoryError::Missing`] when the
    /// id is unknown.
    async fn delete(&self, id: &DocumentId) -> Result<(), ArticleRepositoryError>;

    /// Atomically add one view and return the new total.
    async fn increment_views(&self, slug: &Slug) -> Result<u64, ArticleRepositoryError>;
}
