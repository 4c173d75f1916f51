//! URL slugs for product detail pages.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A URL-safe product handle, e.g. `"linen-shirt"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Maximum slug length accepted by the data store.
    pub const MAX_LENGTH: usize = 96;

    /// Wrap an existing slug verbatim.
    #[must_use]
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// Derive a slug from a product title.
    ///
    /// Lowercases the title and collapses every whitespace run into a single
    /// `-`. Leading and trailing whitespace is dropped and the result is
    /// capped at [`Slug::MAX_LENGTH`] characters.
    ///
    /// ```
    /// use boutique_core::Slug;
    ///
    /// assert_eq!(Slug::from_title("  Linen   Shirt ").as_str(), "linen-shirt");
    /// ```
    #[must_use]
    pub fn from_title(title: &str) -> Self {
        let joined = title
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join("-");
        Self(joined.chars().take(Self::MAX_LENGTH).collect())
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the slug has no characters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_title_collapses_whitespace() {
        assert_eq!(Slug::from_title("Summer\tLinen  Shirt").as_str(), "summer-linen-shirt");
    }

    #[test]
    fn test_from_title_truncates() {
        let slug = Slug::from_title(&"a".repeat(200));
        assert_eq!(slug.as_str().len(), Slug::MAX_LENGTH);
    }

    #[test]
    fn test_from_title_blank() {
        assert!(Slug::from_title("   ").is_empty());
    }
}
