//! Port for media records and their binary content.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{DocumentId, Media, MediaContent, MediaUpload, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by media repository adapters.
    pub enum MediaRepositoryError {
        /// Store could not be reached.
        Connection { message: String } => "media repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "media repository query failed: {message}",
        /// No media record exists under the given id.
        Missing { id: String } => "media {id} does not exist",
    }
}

/// Store for uploaded files.
///
/// Record and blob are written together: a failed upload leaves neither
/// behind. Blob reclamation on delete is best effort.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Media>, MediaRepositoryError>;

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Media>, MediaRepositoryError>;

    /// Persist the blob and its record, resolving the public URL.
    async fn upload(
        &self,
        upload: MediaUpload,
        uploaded_by: &UserId,
        created_at: DateTime<Utc>,
    ) -> Result<Media, MediaRepositoryError>;

    /// Stored bytes for a record, if both still exist.
    async fn read_content(
        &self,
        id: &DocumentId,
    ) -> Result<Option<MediaContent>, MediaRepositoryError>;

    /// Remove a record, or fail with `Missing`.
    async fn delete(&self, id: &DocumentId) -> Result<(), MediaRepositoryError>;
}
