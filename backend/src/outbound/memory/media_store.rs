//! Media records and their bytes held in memory.
//!
//! Public URLs are resolved against a configured base; the HTTP adapter
//! serves `{base}/{id}/{filename}` from [`MediaRepository::read_content`].

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use url::Url;

use crate::domain::ports::{MediaRepository, MediaRepositoryError};
use crate::domain::{DocumentId, Media, MediaContent, MediaUpload, UserId};

use super::fresh_id;

#[derive(Debug)]
struct StoredMedia {
    record: Media,
    bytes: Vec<u8>,
}

/// [`MediaRepository`] keeping record and blob side by side.
#[derive(Debug)]
pub struct MemoryMediaStore {
    base_url: Url,
    documents: RwLock<HashMap<DocumentId, StoredMedia>>,
}

impl MemoryMediaStore {
    /// Store serving files below `base_url`.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            documents: RwLock::new(HashMap::new()),
        }
    }

    fn public_url(&self, id: &DocumentId, filename: &str) -> Result<Url, MediaRepositoryError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                MediaRepositoryError::query(format!(
                    "media base url {} cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push(id.as_ref())
            .push(filename);
        Ok(url)
    }
}

#[async_trait]
impl MediaRepository for MemoryMediaStore {
    async fn list(&self) -> Result<Vec<Media>, MediaRepositoryError> {
        let documents = self.documents.read().await;
        Ok(documents
            .values()
            .map(|stored| stored.record.clone())
            .collect())
    }

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Media>, MediaRepositoryError> {
        let documents = self.documents.read().await;
        Ok(documents.get(id).map(|stored| stored.record.clone()))
    }

    async fn upload(
        &self,
        upload: MediaUpload,
        uploaded_by: &UserId,
        created_at: DateTime<Utc>,
    ) -> Result<Media, MediaRepositoryError> {
        let mut documents = self.documents.write().await;
        let id = fresh_id(&documents);
        let url = self.public_url(&id, upload.filename())?;
        let record = Media {
            id: id.clone(),
            filename: upload.filename().to_owned(),
            url: url.into(),
            mime_type: upload.mime_type().to_owned(),
            size: upload.size(),
            alt_text: upload.alt_text().map(str::to_owned),
            caption: upload.caption().map(str::to_owned),
            uploaded_by: uploaded_by.clone(),
            created_at,
        };
        documents.insert(
            id,
            StoredMedia {
                record: record.clone(),
                bytes: upload.into_bytes(),
            },
        );
        Ok(record)
    }

    async fn read_content(
        &self,
        id: &DocumentId,
    ) -> Result<Option<MediaContent>, MediaRepositoryError> {
        let documents = self.documents.read().await;
        Ok(documents.get(id).map(|stored| MediaContent {
            mime_type: stored.record.mime_type.clone(),
            bytes: stored.bytes.clone(),
        }))
    }

    async fn delete(&self, id: &DocumentId) -> Result<(), MediaRepositoryError> {
        self.documents
            .write()
            .await
            .remove(id)
            .map(drop)
            .ok_or_else(|| MediaRepositoryError::missing(id.clone()))
    }
}
