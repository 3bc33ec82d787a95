//! Domain primitives, permission rules, and content services.
//!
//! Purpose: define the strongly typed entities of the CMS, the role-based
//! permission engine that guards every mutation, and the services that
//! apply those rules before touching a driven port. Nothing here knows
//! about HTTP or a concrete store.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Role, User, AuthIdentity: who is acting.
//! - Article, Page, Media: content records with their drafts and change sets.
//! - `permissions`: pure predicates plus [`Capabilities`].
//! - ArticleService, PageService, MediaService, UserAdminService: use-cases.
//! - IdentityResolver, SessionResolver: identity to user mapping.

pub mod article;
pub mod article_service;
pub mod auth;
pub mod content;
pub mod document_id;
pub mod error;
pub mod identity;
pub mod listing_cache;
pub mod media;
pub mod media_service;
pub mod page;
pub mod page_service;
pub mod permissions;
pub mod ports;
pub mod role;
pub mod slug;
pub mod trace_id;
pub mod user;
pub mod user_admin_service;

pub use self::article::{
    Article, ArticleAuthor, ArticleChanges, ArticleDraft, ArticleStatus, NewArticle,
};
pub use self::article_service::ArticleService;
pub use self::auth::{AuthIdentity, LoginCredentials, LoginValidationError};
pub use self::content::{ContentValidationError, normalize_tags};
pub use self::document_id::{DocumentId, DocumentIdError};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity::{IdentityResolver, SessionResolver, SessionState};
pub use self::media::{Media, MediaContent, MediaUpload, MediaValidationError};
pub use self::media_service::MediaService;
pub use self::page::{NewPage, Page, PageChanges, PageDraft, PageStatus};
pub use self::page_service::PageService;
pub use self::permissions::Capabilities;
pub use self::role::{Role, UnknownRole};
pub use self::slug::{Slug, SlugError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    DISPLAY_NAME_MAX, DisplayName, Email, USER_ID_MAX, User, UserChanges, UserId,
    UserValidationError,
};
pub use self::user_admin_service::UserAdminService;

