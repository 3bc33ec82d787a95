//! Uploaded media files and their metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{DocumentId, Error, UserId};

/// Reasons an upload is rejected before it reaches the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MediaValidationError {
    #[error("filename must not be empty")]
    EmptyFilename,
    #[error("filename must not contain path separators or control characters")]
    InvalidFilename,
    #[error("mime type must look like type/subtype")]
    InvalidMimeType,
    #[error("uploaded file must not be empty")]
    EmptyFile,
}

impl MediaValidationError {
    /// Payload field the error refers to.
    pub const fn field(self) -> &'static str {
        match self {
            Self::EmptyFilename | Self::InvalidFilename => "filename",
            Self::InvalidMimeType => "mimeType",
            Self::EmptyFile => "file",
        }
    }

    /// Stable machine-readable reason.
    pub const fn code(self) -> &'static str {
        match self {
            Self::EmptyFilename => "empty_filename",
            Self::InvalidFilename => "invalid_filename",
            Self::InvalidMimeType => "invalid_mime_type",
            Self::EmptyFile => "empty_file",
        }
    }
}

impl From<MediaValidationError> for Error {
    fn from(value: MediaValidationError) -> Self {
        Error::invalid_request(value.to_string())
            .with_details(json!({ "field": value.field(), "code": value.code() }))
    }
}

/// Stored media record. The binary lives with the store adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    #[schema(value_type = String)]
    pub id: DocumentId,
    pub filename: String,
    /// Resolved location the file is served from.
    pub url: String,
    pub mime_type: String,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[schema(value_type = String)]
    pub uploaded_by: UserId,
    pub created_at: DateTime<Utc>,
}

/// Validated upload.
///
/// ## Invariants
/// - `filename` is a single path segment without control characters.
/// - `mime_type` contains a `/`.
/// - `bytes` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUpload {
    filename: String,
    mime_type: String,
    bytes: Vec<u8>,
    alt_text: Option<String>,
    caption: Option<String>,
}

impl MediaUpload {
    /// Validate raw upload parts.
    ///
    /// # Examples
    /// ```
    /// use portfolio_cms::domain::MediaUpload;
    ///
    /// let upload = MediaUpload::new("cat.png", "image/png", vec![1, 2, 3]).unwrap();
    /// assert_eq!(upload.size(), 3);
    /// assert!(MediaUpload::new("../cat.png", "image/png", vec![1]).is_err());
    /// ```
    pub fn new(
        filename: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Self, MediaValidationError> {
        let filename = filename.trim();
        if filename.is_empty() {
            return Err(MediaValidationError::EmptyFilename);
        }
        if filename
            .chars()
            .any(|ch| ch == '/' || ch == '\\' || ch.is_control())
            || filename == "."
            || filename == ".."
        {
            return Err(MediaValidationError::InvalidFilename);
        }
        let mime_type = mime_type.trim();
        match mime_type.split_once('/') {
            Some((kind, subtype)) if !kind.is_empty() && !subtype.is_empty() => {}
            _ => return Err(MediaValidationError::InvalidMimeType),
        }
        if bytes.is_empty() {
            return Err(MediaValidationError::EmptyFile);
        }
        Ok(Self {
            filename: filename.to_owned(),
            mime_type: mime_type.to_ascii_lowercase(),
            bytes,
            alt_text: None,
            caption: None,
        })
    }

    /// Attach alternative text; blank values are dropped.
    #[must_use]
    pub fn with_alt_text(mut self, alt_text: Option<String>) -> Self {
        self.alt_text = non_blank(alt_text);
        self
    }

    /// Attach a caption; blank values are dropped.
    #[must_use]
    pub fn with_caption(mut self, caption: Option<String>) -> Self {
        self.caption = non_blank(caption);
        self
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn alt_text(&self) -> Option<&str> {
        self.alt_text.as_deref()
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    /// Hand the payload bytes to the store.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

/// Stored file contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaContent {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Listing order: newest upload first.
pub fn sort_for_listing(media: &mut [Media]) {
    media.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "image/png", vec![1], MediaValidationError::EmptyFilename)]
    #[case("a/b.png", "image/png", vec![1], MediaValidationError::InvalidFilename)]
    #[case("..", "image/png", vec![1], MediaValidationError::InvalidFilename)]
    #[case("a\u{0}.png", "image/png", vec![1], MediaValidationError::InvalidFilename)]
    #[case("a.png", "png", vec![1], MediaValidationError::InvalidMimeType)]
    #[case("a.png", "image/", vec![1], MediaValidationError::InvalidMimeType)]
    #[case("a.png", "image/png", vec![], MediaValidationError::EmptyFile)]
    fn invalid_uploads_are_rejected(
        #[case] filename: &str,
        #[case] mime: &str,
        #[case] bytes: Vec<u8>,
        #[case] expected: MediaValidationError,
    ) {
        assert_eq!(
            MediaUpload::new(filename, mime, bytes).expect_err("invalid upload"),
            expected
        );
    }

    #[rstest]
    fn optional_text_is_trimmed_and_blank_dropped() {
        let upload = MediaUpload::new(" cat photo.png ", "Image/PNG", vec![0; 4])
            .expect("valid upload")
            .with_alt_text(Some("  a cat ".into()))
            .with_caption(Some("   ".into()));
        assert_eq!(upload.filename(), "cat photo.png");
        assert_eq!(upload.mime_type(), "image/png");
        assert_eq!(upload.alt_text(), Some("a cat"));
        assert_eq!(upload.caption(), None);
        assert_eq!(upload.size(), 4);
    }

    #[rstest]
    fn validation_errors_carry_field_details() {
        let err: Error = MediaValidationError::InvalidMimeType.into();
        assert_eq!(
            err.details(),
            Some(&json!({ "field": "mimeType", "code": "invalid_mime_type" }))
        );
    }
}
