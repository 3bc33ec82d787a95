//! Blog articles.
//!
//! Articles are the only ownership-sensitive content type: the embedded
//! [`ArticleAuthor`] snapshot decides whether a plain author may edit the
//! record later on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::content::{
    normalize_tags, publication_time, resolve_slug, validate_content, validate_title,
};
use crate::domain::{ContentValidationError, DocumentId, Slug, User, UserId};

/// Editorial state of an article. Any state may move to any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

/// Author details captured when the article was created.
///
/// The snapshot is not refreshed when the author's profile changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleAuthor {
    #[schema(value_type = String)]
    pub id: UserId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl ArticleAuthor {
    /// Capture the acting user's current profile.
    pub fn snapshot(user: &User) -> Self {
        Self {
            id: user.id().clone(),
            name: user.name().to_string(),
            avatar: user.avatar().map(str::to_owned),
        }
    }
}

/// Stored article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[schema(value_type = String)]
    pub id: DocumentId,
    pub title: String,
    #[schema(value_type = String, example = "hello-world")]
    pub slug: Slug,
    pub content: String,
    pub excerpt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub author: ArticleAuthor,
    pub tags: Vec<String>,
    pub category: String,
    pub status: ArticleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    pub views: u64,
}

impl Article {
    /// Materialise a stored record from a validated draft.
    pub fn from_new(id: DocumentId, new: NewArticle) -> Self {
        Self {
            id,
            title: new.title,
            slug: new.slug,
            content: new.content,
            excerpt: new.excerpt,
            cover_image: new.cover_image,
            author: new.author,
            tags: new.tags,
            category: new.category,
            status: new.status,
            created_at: new.created_at,
            updated_at: new.updated_at,
            published_at: new.published_at,
            views: 0,
        }
    }

    /// Merge validated changes and refresh `updated_at`.
    ///
    /// `slug`, `author`, `created_at`, and `views` are never touched.
    pub fn apply(&mut self, changes: ArticleChanges, now: DateTime<Utc>) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
        if let Some(excerpt) = changes.excerpt {
            self.excerpt = excerpt;
        }
        if let Some(cover_image) = changes.cover_image {
            self.cover_image = cover_image;
        }
        if let Some(tags) = changes.tags {
            self.tags = tags;
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        self.updated_at = now;
        self.published_at = publication_time(
            self.published_at,
            self.status == ArticleStatus::Published,
            now,
        );
    }
}

/// Caller-supplied article fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleDraft {
    pub title: String,
    /// Explicit slug; derived from the title when absent.
    pub slug: Option<String>,
    pub content: String,
    pub excerpt: String,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub category: String,
    pub status: ArticleStatus,
}

impl ArticleDraft {
    /// Validate the draft and stamp it for insertion.
    pub fn validate(
        self,
        author: ArticleAuthor,
        now: DateTime<Utc>,
    ) -> Result<NewArticle, ContentValidationError> {
        let title = validate_title(&self.title)?;
        let content = validate_content(self.content)?;
        let slug = resolve_slug(self.slug.as_deref(), &title)?;
        Ok(NewArticle {
            slug,
            title,
            content,
            excerpt: self.excerpt.trim().to_owned(),
            cover_image: self.cover_image.filter(|value| !value.trim().is_empty()),
            author,
            tags: normalize_tags(self.tags),
            category: self.category.trim().to_owned(),
            status: self.status,
            created_at: now,
            updated_at: now,
            published_at: publication_time(None, self.status == ArticleStatus::Published, now),
        })
    }
}

/// Validated article awaiting a store-assigned id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    pub slug: Slug,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub cover_image: Option<String>,
    pub author: ArticleAuthor,
    pub tags: Vec<String>,
    pub category: String,
    pub status: ArticleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Partial article update. `None` leaves a field unchanged and
/// `cover_image: Some(None)` clears the cover.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub cover_image: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
    pub status: Option<ArticleStatus>,
}

impl ArticleChanges {
    /// Apply the same normalisation rules as [`ArticleDraft::validate`].
    pub fn validate(self) -> Result<Self, ContentValidationError> {
        Ok(Self {
            title: self.title.as_deref().map(validate_title).transpose()?,
            content: self.content.map(validate_content).transpose()?,
            excerpt: self.excerpt.map(|value| value.trim().to_owned()),
            cover_image: self
                .cover_image
                .map(|cover| cover.filter(|value| !value.trim().is_empty())),
            tags: self.tags.map(normalize_tags),
            category: self.category.map(|value| value.trim().to_owned()),
            status: self.status,
        })
    }
}

/// Listing order: most recently published first, unpublished records last,
/// ties broken by newest creation.
pub fn sort_for_listing(articles: &mut [Article]) {
    articles.sort_by(|a, b| {
        b.published_at
            .cmp(&a.published_at)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}
