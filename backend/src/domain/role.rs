//! Capability tiers assigned to users.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A caller's capability tier.
///
/// Variants are declared from least to most capable so the derived ordering
/// matches containment: every capability of `Author` is held by `Editor`,
/// and every capability of `Editor` is held by `Admin`.
///
/// # Examples
/// ```
/// use portfolio_cms::domain::Role;
///
/// assert!(Role::Admin > Role::Editor);
/// assert!(Role::Editor.is_at_least(Role::Author));
/// assert_eq!("editor".parse::<Role>().unwrap(), Role::Editor);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May write articles and update their own.
    Author,
    /// May create and update any article or page.
    Editor,
    /// Full control including deletes and user management.
    Admin,
}

impl Role {
    /// Role granted to identities seen for the first time.
    pub const DEFAULT: Self = Self::Author;

    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::Editor => "editor",
            Self::Admin => "admin",
        }
    }

    /// Whether this tier contains every capability of `other`.
    #[must_use]
    pub fn is_at_least(self, other: Self) -> bool {
        self >= other
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "author" => Ok(Self::Author),
            "editor" => Ok(Self::Editor),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}
