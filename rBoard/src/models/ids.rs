//! Type-safe ID wrappers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! define_numeric_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Create a new ID.
            pub fn new(id: i64) -> Self {
                $name(id)
            }

            /// Check if this ID is unset (zero).
            pub fn is_empty(&self) -> bool {
                self.0 == 0
            }

            /// Get the inner value.
            pub fn get(&self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(n: i64) -> Self {
                $name(n)
            }
        }

        impl From<i32> for $name {
            fn from(n: i32) -> Self {
                $name(n as i64)
            }
        }

        impl From<u32> for $name {
            fn from(n: u32) -> Self {
                $name(n as i64)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map($name)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_numeric_id!(PostId, "A post identifier.");
define_numeric_id!(CommentId, "A comment identifier.");
define_numeric_id!(AttachmentId, "An attachment identifier.");

/// A user identifier (the login name).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Create a new ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        UserId(id.into())
    }

    /// Check if this ID is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        UserId(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        UserId(s.to_owned())
    }
}

impl From<&String> for UserId {
    fn from(s: &String) -> Self {
        UserId(s.clone())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = PostId::new(12345);
        assert_eq!(id.get(), 12345);
        assert_eq!(format!("{}", id), "12345");
    }

    #[test]
    fn test_id_from_str() {
        let id: CommentId = " 42 ".parse().unwrap();
        assert_eq!(id, CommentId(42));
        assert!("abc".parse::<CommentId>().is_err());
    }

    #[test]
    fn test_id_is_empty() {
        assert!(PostId::default().is_empty());
        assert!(!PostId::new(3).is_empty());
        assert!(UserId::new("").is_empty());
        assert!(!UserId::new("admin").is_empty());
    }

    #[test]
    fn test_id_serde_transparent() {
        let json = serde_json::to_string(&AttachmentId(7)).unwrap();
        assert_eq!(json, "7");
        let user: UserId = serde_json::from_str("\"hong\"").unwrap();
        assert_eq!(user.as_str(), "hong");
    }
}
