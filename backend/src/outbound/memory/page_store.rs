//! Page documents held in memory.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{PageRepository, PageRepositoryError};
use crate::domain::{DocumentId, NewPage, Page, Slug};

use super::fresh_id;

/// [`PageRepository`] keeping every page in a hash map.
#[derive(Debug, Default)]
pub struct MemoryPageStore {
    documents: RwLock<HashMap<DocumentId, Page>>,
}

impl MemoryPageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PageRepository for MemoryPageStore {
    async fn list(&self) -> Result<Vec<Page>, PageRepositoryError> {
        Ok(self.documents.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Page>, PageRepositoryError> {
        Ok(self.documents.read().await.get(id).cloned())
    }

    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Page>, PageRepositoryError> {
        let documents = self.documents.read().await;
        Ok(documents.values().find(|page| page.slug == *slug).cloned())
    }

    async fn insert(&self, page: NewPage) -> Result<Page, PageRepositoryError> {
        let mut documents = self.documents.write().await;
        if documents.values().any(|stored| stored.slug == page.slug) {
            return Err(PageRepositoryError::duplicate_slug(page.slug));
        }
        let id = fresh_id(&documents);
        let stored = Page::from_new(id.clone(), page);
        documents.insert(id, stored.clone());
        Ok(stored)
    }

    async fn replace(&self, page: &Page) -> Result<Page, PageRepositoryError> {
        let mut documents = self.documents.write().await;
        if documents
            .values()
            .any(|stored| stored.slug == page.slug && stored.id != page.id)
        {
            return Err(PageRepositoryError::duplicate_slug(page.slug.clone()));
        }
        let stored = documents
            .get_mut(&page.id)
            .ok_or_else(|| PageRepositoryError::missing(page.id.clone()))?;
        stored.clone_from(page);
        Ok(page.clone())
    }

    async fn delete(&self, id: &DocumentId) -> Result<(), PageRepositoryError> {
        self.documents
            .write()
            .await
            .remove(id)
            .map(drop)
            .ok_or_else(|| PageRepositoryError::missing(id.clone()))
    }
}
