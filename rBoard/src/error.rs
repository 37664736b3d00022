//! Error types.

use thiserror::Error;

use crate::form::FormError;

/// The main error type for rBoard operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network-related error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Board API returned an error response.
    #[error("Board API error [{status}]: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response data.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Operation requires authentication but none was provided.
    #[error("Authentication required")]
    AuthRequired,

    /// A required field was missing in the response.
    #[error("Missing field: {0}")]
    MissingField(String),

    /// Invalid argument passed to an API method.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Post form failed local validation.
    #[error("Invalid form: {0}")]
    Form(#[from] FormError),

    /// Cache storage error.
    #[error("Cache error: {0}")]
    Cache(String),

    /// Local file error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Create a board API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Error::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    /// Create a missing field error.
    pub fn missing(field: impl Into<String>) -> Self {
        Error::MissingField(field.into())
    }

    /// Create an invalid argument error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Check if this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(_) => true,
            Error::Api { status, .. } => (500..=599).contains(status),
            _ => false,
        }
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        match self {
            Error::AuthRequired => true,
            Error::Api { status, .. } => *status == 401 || *status == 403,
            _ => false,
        }
    }

    /// Check if the requested resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api { status: 404, .. })
    }
}

/// Result type alias for rBoard operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::api(404, "Post not found");
        assert_eq!(format!("{}", e), "Board API error [404]: Post not found");
    }

    #[test]
    fn test_retryable() {
        assert!(Error::api(502, "bad gateway").is_retryable());
        assert!(!Error::api(400, "bad request").is_retryable());
        assert!(!Error::AuthRequired.is_retryable());
    }

    #[test]
    fn test_classifiers() {
        assert!(Error::AuthRequired.is_auth_error());
        assert!(Error::api(401, "Invalid token").is_auth_error());
        assert!(Error::api(403, "Not authorized").is_auth_error());
        assert!(!Error::api(404, "missing").is_auth_error());
        assert!(Error::api(404, "missing").is_not_found());
        assert!(!Error::invalid("x").is_not_found());
    }
}
