//! Media use-cases: upload, browse, serve, delete.

use std::sync::Arc;

use mockable::Clock;
use tracing::debug;

use crate::domain::listing_cache::ListingCache;
use crate::domain::media::sort_for_listing;
use crate::domain::permissions::{can_delete_media, can_manage_media};
use crate::domain::ports::{MediaRepository, MediaRepositoryError};
use crate::domain::{DocumentId, Error, Media, MediaContent, MediaUpload, User};

/// Media service over a [`MediaRepository`].
pub struct MediaService<R: ?Sized> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
    listing: ListingCache<Media>,
}

impl<R: ?Sized> MediaService<R> {
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            clock,
            listing: ListingCache::new(),
        }
    }
}

impl<R> MediaService<R>
where
    R: MediaRepository + ?Sized,
{
    /// All media, newest first.
    pub async fn list(&self) -> Result<Vec<Media>, Error> {
        self.listing
            .get_or_load(|| async {
                let mut media = self.repo.list().await.map_err(map_media_error)?;
                sort_for_listing(&mut media);
                Ok(media)
            })
            .await
    }

    pub async fn refresh(&self) -> Result<Vec<Media>, Error> {
        self.listing.invalidate().await;
        self.list().await
    }

    pub async fn get_by_id(&self, id: &DocumentId) -> Result<Option<Media>, Error> {
        self.repo.find_by_id(id).await.map_err(map_media_error)
    }

    /// Stored bytes of a media record.
    pub async fn content(&self, id: &DocumentId) -> Result<MediaContent, Error> {
        self.repo
            .read_content(id)
            .await
            .map_err(map_media_error)?
            .ok_or_else(|| Error::not_found(format!("media {id} not found")))
    }

    /// Store an upload on behalf of `acting_user`.
    pub async fn upload(
        &self,
        upload: MediaUpload,
        acting_user: Option<&User>,
    ) -> Result<Media, Error> {
        let uploader = match acting_user {
            Some(user) if can_manage_media(acting_user) => user.id(),
            _ => return Err(Error::forbidden("sign in to upload media")),
        };
        let media = self
            .repo
            .upload(upload, uploader, self.clock.utc())
            .await
            .map_err(map_media_error)?;
        self.listing.invalidate().await;
        debug!(media_id = %media.id, size = media.size, "media uploaded");
        Ok(media)
    }

    /// Delete a media record. Deleting an unknown id succeeds.
    pub async fn delete(&self, id: &DocumentId, acting_user: Option<&User>) -> Result<(), Error> {
        if !can_delete_media(acting_user) {
            return Err(Error::forbidden("only admins may delete media"));
        }
        match self.repo.delete(id).await {
            Ok(()) | Err(MediaRepositoryError::Missing { .. }) => {}
            Err(err) => return Err(map_media_error(err)),
        }
        self.listing.invalidate().await;
        debug!(media_id = %id, "media deleted");
        Ok(())
    }
}

fn map_media_error(error: MediaRepositoryError) -> Error {
    match error {
        MediaRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("media repository unavailable: {message}"))
        }
        MediaRepositoryError::Query { message } => {
            Error::internal(format!("media repository error: {message}"))
        }
        MediaRepositoryError::Missing { id } => Error::not_found(format!("media {id} not found")),
    }
}
