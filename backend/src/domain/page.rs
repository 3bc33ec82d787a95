//! Standalone site pages (about, contact, ...) ordered for navigation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::content::{publication_time, resolve_slug, validate_content, validate_title};
use crate::domain::{ContentValidationError, DocumentId, Slug};

/// Visibility of a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    #[default]
    Draft,
    Published,
}

/// Stored page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[schema(value_type = String)]
    pub id: DocumentId,
    pub title: String,
    #[schema(value_type = String, example = "about")]
    pub slug: Slug,
    pub content: String,
    /// Navigation sort key; several pages may share a value.
    pub order: i32,
    pub status: PageStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl Page {
    /// Materialise a stored record from a validated draft.
    pub fn from_new(id: DocumentId, new: NewPage) -> Self {
        Self {
            id,
            title: new.title,
            slug: new.slug,
            content: new.content,
            order: new.order,
            status: new.status,
            created_at: new.created_at,
            updated_at: new.updated_at,
            published_at: new.published_at,
        }
    }

    /// Merge validated changes and refresh `updated_at`.
    pub fn apply(&mut self, changes: PageChanges, now: DateTime<Utc>) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
        if let Some(order) = changes.order {
            self.order = order;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        self.updated_at = now;
        self.published_at =
            publication_time(self.published_at, self.status == PageStatus::Published, now);
    }
}

/// Caller-supplied page fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageDraft {
    pub title: String,
    pub slug: Option<String>,
    pub content: String,
    pub order: i32,
    pub status: PageStatus,
}

impl PageDraft {
    /// Validate the draft and stamp it for insertion.
    pub fn validate(self, now: DateTime<Utc>) -> Result<NewPage, ContentValidationError> {
        let title = validate_title(&self.title)?;
        let content = validate_content(self.content)?;
        let slug = resolve_slug(self.slug.as_deref(), &title)?;
        Ok(NewPage {
            slug,
            title,
            content,
            order: self.order,
            status: self.status,
            created_at: now,
            updated_at: now,
            published_at: publication_time(None, self.status == PageStatus::Published, now),
        })
    }
}

/// Validated page awaiting a store-assigned id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPage {
    pub slug: Slug,
    pub title: String,
    pub content: String,
    pub order: i32,
    pub status: PageStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Partial page update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub order: Option<i32>,
    pub status: Option<PageStatus>,
}

impl PageChanges {
    /// Apply the same rules as [`PageDraft::validate`].
    pub fn validate(self) -> Result<Self, ContentValidationError> {
        Ok(Self {
            title: self.title.as_deref().map(validate_title).transpose()?,
            content: self.content.map(validate_content).transpose()?,
            order: self.order,
            status: self.status,
        })
    }
}

/// Listing order: ascending `order`, equal keys by creation time.
pub fn sort_for_listing(pages: &mut [Page]) {
    pages.sort_by(|a, b| {
        a.order
            .cmp(&b.order)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}
