//! URL-safe identifiers for articles and pages.
//!
//! Slugs are non-empty strings of lowercase ASCII letters, digits, and
//! hyphens. They are derived from a title at creation time and never change
//! afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Errors raised when constructing a [`Slug`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlugError {
    /// Nothing usable survived derivation, or the input was empty.
    #[error("slug must not be empty")]
    Empty,
    /// Characters outside `[a-z0-9-]` were supplied.
    #[error("slug may only contain lowercase letters, digits, and hyphens")]
    InvalidCharacters,
}

/// Validated slug.
///
/// # Examples
/// ```
/// use portfolio_cms::domain::Slug;
///
/// let slug = Slug::from_title("Hello Rust World!").unwrap();
/// assert_eq!(slug.as_ref(), "hello-rust-world");
/// assert!(Slug::new("Not Valid").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Accept an explicit slug, which must already be in canonical form.
    pub fn new(value: impl Into<String>) -> Result<Self, SlugError> {
        let value = value.into();
        if value.is_empty() {
            return Err(SlugError::Empty);
        }
        if !has_allowed_slug_chars(&value) {
            return Err(SlugError::InvalidCharacters);
        }
        Ok(Self(value))
    }

    /// Derive a slug from a title.
    ///
    /// The title is trimmed and lowercased, each whitespace run becomes a
    /// single hyphen, and every remaining character outside `[a-z0-9-]` is
    /// dropped. Titles written entirely in non-ASCII scripts therefore yield
    /// [`SlugError::Empty`].
    pub fn from_title(title: &str) -> Result<Self, SlugError> {
        let mut slug = String::with_capacity(title.len());
        let mut in_whitespace = false;
        for ch in title.trim().to_lowercase().chars() {
            if ch.is_whitespace() {
                if !in_whitespace {
                    slug.push('-');
                }
                in_whitespace = true;
                continue;
            }
            in_whitespace = false;
            if is_slug_char(ch) {
                slug.push(ch);
            }
        }
        Self::new(slug)
    }
}

fn is_slug_char(ch: char) -> bool {
    ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-'
}

fn has_allowed_slug_chars(value: &str) -> bool {
    value.chars().all(is_slug_char)
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Slug> for String {
    fn from(value: Slug) -> Self {
        value.0
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Hello World", "hello-world")]
    #[case("  Rust   in\tAction  ", "rust-in-action")]
    #[case("C++ & Rust: 2024", "c--rust-2024")]
    #[case("Already-hyphenated title", "already-hyphenated-title")]
    #[case("Über Café", "ber-caf")]
    #[case("Mixed 中文 Title", "mixed--title")]
    fn derives_slug_from_title(#[case] title: &str, #[case] expected: &str) {
        let slug = Slug::from_title(title).expect("derivable title");
        assert_eq!(slug.as_ref(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("你好")]
    #[case("!!!")]
    fn underivable_titles_are_rejected(#[case] title: &str) {
        assert_eq!(Slug::from_title(title), Err(SlugError::Empty));
    }

    #[rstest]
    #[case("about-me", true)]
    #[case("2024-recap", true)]
    #[case("About", false)]
    #[case("with space", false)]
    #[case("under_score", false)]
    fn explicit_slugs_must_be_canonical(#[case] raw: &str, #[case] valid: bool) {
        assert_eq!(Slug::new(raw).is_ok(), valid);
    }
}
