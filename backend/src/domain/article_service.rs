//! Article use-cases.
//!
//! Reads are public. Every mutation first consults the permission engine and
//! only then touches the repository. Successful mutations invalidate the
//! cached listing.

use std::sync::Arc;

use mockable::Clock;
use serde_json::json;
use tracing::debug;

use crate::domain::article::sort_for_listing;
use crate::domain::listing_cache::ListingCache;
use crate::domain::permissions::{can_create_article, can_delete_article, can_update_article};
use crate::domain::ports::{ArticleRepository, ArticleRepositoryError};
use crate::domain::{
    Article, ArticleAuthor, ArticleChanges, ArticleDraft, DocumentId, Error, Slug, User,
};

/// Article service over an [`ArticleRepository`].
pub struct ArticleService<R: ?Sized> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
    listing: ListingCache<Article>,
}

impl<R: ?Sized> ArticleService<R> {
    /// Create a service with an empty listing cache.
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            clock,
            listing: ListingCache::new(),
        }
    }
}

impl<R> ArticleService<R>
where
    R: ArticleRepository + ?Sized,
{
    /// All articles, latest publication first.
    pub async fn list(&self) -> Result<Vec<Article>, Error> {
        self.listing
            .get_or_load(|| async {
                let mut articles = self.repo.list().await.map_err(map_article_error)?;
                sort_for_listing(&mut articles);
                Ok(articles)
            })
            .await
    }

    /// Drop the cached listing and fetch it again.
    pub async fn refresh(&self) -> Result<Vec<Article>, Error> {
        self.listing.invalidate().await;
        self.list().await
    }

    /// Look an article up by slug. Unknown or malformed slugs yield `None`.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Article>, Error> {
        let Ok(slug) = Slug::new(slug) else {
            return Ok(None);
        };
        self.repo
            .find_by_slug(&slug)
            .await
            .map_err(map_article_error)
    }

    pub async fn get_by_id(&self, id: &DocumentId) -> Result<Option<Article>, Error> {
        self.repo.find_by_id(id).await.map_err(map_article_error)
    }

    /// Create an article authored by `acting_user`.
    pub async fn create(
        &self,
        draft: ArticleDraft,
        acting_user: Option<&User>,
    ) -> Result<Article, Error> {
        let author = match acting_user {
            Some(user) if can_create_article(acting_user) => ArticleAuthor::snapshot(user),
            _ => return Err(Error::forbidden("you are not allowed to create articles")),
        };
        let new = draft.validate(author, self.clock.utc())?;
        let article = self.repo.insert(new).await.map_err(map_article_error)?;
        self.listing.invalidate().await;
        debug!(article_id = %article.id, slug = %article.slug, "article created");
        Ok(article)
    }

    /// Merge `changes` into an existing article.
    ///
    /// Ownership is checked against the stored author, so the record is
    /// loaded before the permission decision. Anonymous callers are turned
    /// away without a lookup.
    pub async fn update(
        &self,
        id: &DocumentId,
        changes: ArticleChanges,
        acting_user: Option<&User>,
    ) -> Result<Article, Error> {
        if acting_user.is_none() {
            return Err(update_denied());
        }
        let mut article = self
            .repo
            .find_by_id(id)
            .await
            .map_err(map_article_error)?
            .ok_or_else(|| article_not_found(id))?;
        if !can_update_article(acting_user, Some(&article.author.id)) {
            return Err(update_denied());
        }
        let changes = changes.validate()?;
        article.apply(changes, self.clock.utc());
        let article = self
            .repo
            .replace(&article)
            .await
            .map_err(map_article_error)?;
        self.listing.invalidate().await;
        debug!(article_id = %article.id, "article updated");
        Ok(article)
    }

    /// Delete an article. Deleting an unknown id succeeds.
    pub async fn delete(&self, id: &DocumentId, acting_user: Option<&User>) -> Result<(), Error> {
        if !can_delete_article(acting_user) {
            return Err(Error::forbidden("only admins may delete articles"));
        }
        match self.repo.delete(id).await {
            Ok(()) => debug!(article_id = %id, "article deleted"),
            Err(ArticleRepositoryError::Missing { .. }) => {
                debug!(article_id = %id, "article already absent");
            }
            Err(err) => return Err(map_article_error(err)),
        }
        self.listing.invalidate().await;
        Ok(())
    }

    /// Count one view of a published or draft article and return the total.
    ///
    /// Cached listings keep their view counts until the next invalidation.
    pub async fn record_view(&self, slug: &str) -> Result<u64, Error> {
        let parsed = Slug::new(slug).map_err(|_| slug_not_found(slug))?;
        match self.repo.increment_views(&parsed).await {
            Ok(views) => Ok(views),
            Err(ArticleRepositoryError::Missing { .. }) => Err(slug_not_found(slug)),
            Err(err) => Err(map_article_error(err)),
        }
    }
}

fn update_denied() -> Error {
    Error::forbidden("you are not allowed to update this article")
}

fn article_not_found(id: &DocumentId) -> Error {
    Error::not_found(format!("article {id} not found"))
}

fn slug_not_found(slug: &str) -> Error {
    Error::not_found(format!("no article with slug {slug}"))
}

fn map_article_error(error: ArticleRepositoryError) -> Error {
    match error {
        ArticleRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("article repository unavailable: {message}"))
        }
        ArticleRepositoryError::Query { message } => {
            Error::internal(format!("article repository error: {message}"))
        }
        ArticleRepositoryError::Missing { id } => Error::not_found(format!("article {id} not found")),
        ArticleRepositoryError::DuplicateSlug { slug } => {
            Error::invalid_request(format!("slug {slug} is already in use"))
                .with_details(json!({ "field": "slug", "code": "duplicate_slug" }))
        }
    }
}

#[cfg(test)]
#[path = "article_service_tests.rs"]
mod tests;
