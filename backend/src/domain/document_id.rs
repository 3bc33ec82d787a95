//! Opaque keys for stored content records.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors raised when parsing a [`DocumentId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentIdError {
    #[error("document id must not be empty")]
    Empty,
    #[error("document id may not contain whitespace or path separators")]
    InvalidCharacters,
}

/// Store-assigned identifier of an article, page, or media record.
///
/// Identifiers are compared by exact string equality and are safe to embed
/// in a URL path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(String);

impl DocumentId {
    /// Validate an identifier received from a caller.
    ///
    /// # Examples
    /// ```
    /// use portfolio_cms::domain::DocumentId;
    ///
    /// assert!(DocumentId::new("a1b2").is_ok());
    /// assert!(DocumentId::new("a/b").is_err());
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, DocumentIdError> {
        let value = value.into();
        if value.is_empty() {
            return Err(DocumentIdError::Empty);
        }
        if value
            .chars()
            .any(|ch| ch.is_whitespace() || ch == '/' || ch == '\\')
        {
            return Err(DocumentIdError::InvalidCharacters);
        }
        Ok(Self(value))
    }

    /// Mint a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DocumentId> for String {
    fn from(value: DocumentId) -> Self {
        value.0
    }
}

impl TryFrom<String> for DocumentId {
    type Error = DocumentIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
