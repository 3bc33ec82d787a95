//! Validation shared by articles and pages.
//!
//! Both entity types carry a title, a markdown body, and a slug. The helpers
//! here normalise those fields before a record reaches the store.

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::{Error, Slug, SlugError};

/// Reasons an article or page payload is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ContentValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("content must not be empty")]
    EmptyContent,
    #[error("slug must not be empty")]
    EmptySlug,
    #[error("slug may only contain lowercase letters, digits, and hyphens")]
    InvalidSlug,
}

impl ContentValidationError {
    /// Payload field the error refers to.
    pub const fn field(self) -> &'static str {
        match self {
            Self::EmptyTitle => "title",
            Self::EmptyContent => "content",
            Self::EmptySlug | Self::InvalidSlug => "slug",
        }
    }

    /// Stable machine-readable reason.
    pub const fn code(self) -> &'static str {
        match self {
            Self::EmptyTitle => "empty_title",
            Self::EmptyContent => "empty_content",
            Self::EmptySlug => "empty_slug",
            Self::InvalidSlug => "invalid_slug",
        }
    }
}

impl From<SlugError> for ContentValidationError {
    fn from(value: SlugError) -> Self {
        match value {
            SlugError::Empty => Self::EmptySlug,
            SlugError::InvalidCharacters => Self::InvalidSlug,
        }
    }
}

impl From<ContentValidationError> for Error {
    fn from(value: ContentValidationError) -> Self {
        Error::invalid_request(value.to_string())
            .with_details(json!({ "field": value.field(), "code": value.code() }))
    }
}

/// Trim a title, rejecting blank input.
pub(crate) fn validate_title(title: &str) -> Result<String, ContentValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ContentValidationError::EmptyTitle);
    }
    Ok(trimmed.to_owned())
}

/// Reject blank bodies. Markdown whitespace is significant so the text is
/// stored as given.
pub(crate) fn validate_content(content: String) -> Result<String, ContentValidationError> {
    if content.trim().is_empty() {
        return Err(ContentValidationError::EmptyContent);
    }
    Ok(content)
}

/// Pick the explicit slug when one was supplied, otherwise derive it.
pub(crate) fn resolve_slug(
    explicit: Option<&str>,
    title: &str,
) -> Result<Slug, ContentValidationError> {
    match explicit.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => Ok(Slug::new(value)?),
        None => Ok(Slug::from_title(title)?),
    }
}

/// Trim tags, drop blanks and repeated entries while keeping first-seen order.
///
/// # Examples
/// ```
/// use portfolio_cms::domain::normalize_tags;
///
/// let tags = normalize_tags(vec![" rust ".into(), "".into(), "rust".into(), "web".into()]);
/// assert_eq!(tags, vec!["rust".to_owned(), "web".to_owned()]);
/// ```
pub fn normalize_tags(tags: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::new();
    for tag in tags {
        let trimmed = tag.trim();
        if trimmed.is_empty() || normalized.iter().any(|seen| seen == trimmed) {
            continue;
        }
        normalized.push(trimmed.to_owned());
    }
    normalized
}

/// First-publication timestamp: kept once set, stamped on first publish.
pub(crate) fn publication_time(
    previous: Option<DateTime<Utc>>,
    published: bool,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    previous.or_else(|| published.then_some(now))
}
