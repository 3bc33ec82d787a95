//! Role-based permission checks for content and user management.
//!
//! Every predicate takes the acting user as `Option<&User>`; `None` is an
//! anonymous caller and is denied everything. Predicates never fail: callers
//! turn a `false` into [`Error::forbidden`](crate::domain::Error::forbidden).
//!
//! Article updates are the only ownership-sensitive rule. Plain authors may
//! edit an article only when its stored author id equals their own id; an
//! unknown owner counts as "not theirs".

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Role, User, UserId};

fn has_role(user: Option<&User>, minimum: Role) -> bool {
    user.is_some_and(|user| user.role().is_at_least(minimum))
}

/// Caller holds the `admin` tier.
pub fn is_admin(user: Option<&User>) -> bool {
    has_role(user, Role::Admin)
}

/// Caller holds `editor` or above.
pub fn is_editor(user: Option<&User>) -> bool {
    has_role(user, Role::Editor)
}

/// Caller holds `author` or above.
pub fn is_author(user: Option<&User>) -> bool {
    has_role(user, Role::Author)
}

pub fn can_create_article(user: Option<&User>) -> bool {
    is_editor(user)
}

/// Editors may update any article; authors only their own.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use portfolio_cms::domain::permissions::can_update_article;
/// use portfolio_cms::domain::{DisplayName, Role, User, UserId};
///
/// let author = User::new(
///     UserId::new("3").unwrap(),
///     None,
///     DisplayName::new("Ada").unwrap(),
///     Role::Author,
///     Utc::now(),
/// );
/// let own = UserId::new("3").unwrap();
/// let other = UserId::new("4").unwrap();
/// assert!(can_update_article(Some(&author), Some(&own)));
/// assert!(!can_update_article(Some(&author), Some(&other)));
/// assert!(!can_update_article(Some(&author), None));
/// ```
pub fn can_update_article(user: Option<&User>, article_author_id: Option<&UserId>) -> bool {
    if is_editor(user) {
        return true;
    }
    match (user, article_author_id) {
        (Some(user), Some(owner)) => is_author(Some(user)) && user.id() == owner,
        _ => false,
    }
}

pub fn can_delete_article(user: Option<&User>) -> bool {
    is_admin(user)
}

pub fn can_create_page(user: Option<&User>) -> bool {
    is_editor(user)
}

pub fn can_update_page(user: Option<&User>) -> bool {
    is_editor(user)
}

pub fn can_delete_page(user: Option<&User>) -> bool {
    is_admin(user)
}

/// Any signed-in caller may upload and browse media.
pub fn can_manage_media(user: Option<&User>) -> bool {
    user.is_some()
}

pub fn can_delete_media(user: Option<&User>) -> bool {
    is_admin(user)
}

pub fn can_manage_users(user: Option<&User>) -> bool {
    is_admin(user)
}

/// Snapshot of every role-only predicate for one caller.
///
/// `update_own_articles` reports whether the caller could edit articles they
/// authored; `update_any_article` whether they may edit anyone's.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub create_article: bool,
    pub update_own_articles: bool,
    pub update_any_article: bool,
    pub delete_article: bool,
    pub create_page: bool,
    pub update_page: bool,
    pub delete_page: bool,
    pub manage_media: bool,
    pub delete_media: bool,
    pub manage_users: bool,
}

impl Capabilities {
    /// Evaluate the full matrix for `user`.
    pub fn for_user(user: Option<&User>) -> Self {
        Self {
            create_article: can_create_article(user),
            update_own_articles: can_update_article(user, user.map(User::id)),
            update_any_article: is_editor(user),
            delete_article: can_delete_article(user),
            create_page: can_create_page(user),
            update_page: can_update_page(user),
            delete_page: can_delete_page(user),
            manage_media: can_manage_media(user),
            delete_media: can_delete_media(user),
            manage_users: can_manage_users(user),
        }
    }
}
