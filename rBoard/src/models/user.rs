//! User models.

use serde::{Deserialize, Serialize};

use super::UserId;

/// Name the server uses when an author record is missing.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// The author of a post or comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// User ID.
    pub id: UserId,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

impl Author {
    /// Create an author.
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Get the display string.
    pub fn display(&self) -> &str {
        if self.name.trim().is_empty() {
            UNKNOWN_AUTHOR
        } else {
            &self.name
        }
    }

    /// Upper-cased first character of the name, used as an avatar.
    pub fn initial(&self) -> String {
        self.display()
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }

    /// Check if the server could not resolve this author.
    pub fn is_unknown(&self) -> bool {
        self.display() == UNKNOWN_AUTHOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_display() {
        let author = Author::new("hong", "gildong");
        assert_eq!(author.display(), "gildong");
        assert_eq!(author.initial(), "G");

        let blank = Author::new("ghost", "  ");
        assert_eq!(blank.display(), "Unknown");
        assert!(blank.is_unknown());
    }

    #[test]
    fn test_author_initial_non_ascii() {
        let author = Author::new("kim", "김철수");
        assert_eq!(author.initial(), "김");
    }
}
