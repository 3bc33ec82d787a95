//! Article documents held in memory.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{ArticleRepository, ArticleRepositoryError};
use crate::domain::{Article, DocumentId, NewArticle, Slug};

use super::fresh_id;

/// [`ArticleRepository`] keeping every article in a hash map.
#[derive(Debug, Default)]
pub struct MemoryArticleStore {
    documents: RwLock<HashMap<DocumentId, Article>>,
}

impl MemoryArticleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn slug_taken(
    documents: &HashMap<DocumentId, Article>,
    slug: &Slug,
    except: Option<&DocumentId>,
) -> bool {
    documents
        .values()
        .any(|article| article.slug == *slug && Some(&article.id) != except)
}

#[async_trait]
impl ArticleRepository for MemoryArticleStore {
    async fn list(&self) -> Result<Vec<Article>, ArticleRepositoryError> {
        Ok(self.documents.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Article>, ArticleRepositoryError> {
        Ok(self.documents.read().await.get(id).cloned())
    }

    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Article>, ArticleRepositoryError> {
        let documents = self.documents.read().await;
        Ok(documents
            .values()
            .find(|article| article.slug == *slug)
            .cloned())
    }

    async fn insert(&self, article: NewArticle) -> Result<Article, ArticleRepositoryError> {
        let mut documents = self.documents.write().await;
        if slug_taken(&documents, &article.slug, None) {
            return Err(ArticleRepositoryError::duplicate_slug(article.slug));
        }
        let id = fresh_id(&documents);
        let stored = Article::from_new(id.clone(), article);
        documents.insert(id, stored.clone());
        Ok(stored)
    }

    async fn replace(&self, article: &Article) -> Result<Article, ArticleRepositoryError> {
        let mut documents = self.documents.write().await;
        if slug_taken(&documents, &article.slug, Some(&article.id)) {
            return Err(ArticleRepositoryError::duplicate_slug(article.slug.clone()));
        }
        let stored = documents
            .get_mut(&article.id)
            .ok_or_else(|| ArticleRepositoryError::missing(article.id.clone()))?;
        let views = stored.views;
        *stored = Article {
            views,
            ..article.clone()
        };
        Ok(stored.clone())
    }

    async fn delete(&self, id: &DocumentId) -> Result<(), ArticleRepositoryError> {
        self.documents
            .write()
            .await
            .remove(id)
            .map(drop)
            .ok_or_else(|| ArticleRepositoryError::missing(id.clone()))
    }

    async fn increment_views(&self, slug: &Slug) -> Result<u64, ArticleRepositoryError> {
        let mut documents = self.documents.write().await;
        let article = documents
            .values_mut()
            .find(|article| article.slug == *slug)
            .ok_or_else(|| ArticleRepositoryError::missing(slug.clone()))?;
        article.views = article.views.saturating_add(1);
        Ok(article.views)
    }
}
