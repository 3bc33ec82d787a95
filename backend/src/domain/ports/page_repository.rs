//! Port for page persistence.

use async_trait::async_trait;

use crate::domain::{DocumentId, NewPage, Page, Slug};

use super::define_port_error;

define_port_error! {
    /// Errors raised by page repository adapters.
    pub enum PageRepositoryError {
        /// Store could not be reached.
        Connection { message: String } => "page repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "page repository query failed: {message}",
        /// No page exists under the given id.
        Missing { id: String } => "page {id} does not exist",
        /// Another page already uses the slug.
        DuplicateSlug { slug: String } => "page slug {slug} is already taken",
    }
}

/// Document store for pages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Page>, PageRepositoryError>;

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Page>, PageRepositoryError>;

    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Page>, PageRepositoryError>;

    /// Assign an id and store the record; slugs are unique.
    async fn insert(&self, page: NewPage) -> Result<Page, PageRepositoryError>;

    /// Overwrite an existing record, or fail with `Missing`.
    async fn replace(&self, page: &Page) -> Result<Page, PageRepositoryError>;

    /// Remove a record, or fail with `Missing`.
    async fn delete(&self, id: &DocumentId) -> Result<(), PageRepositoryError>;
}
