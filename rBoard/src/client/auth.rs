//! Authentication state management.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::UserId;

/// Authentication information for the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthInfo {
    /// Bearer token.
    pub token: String,
    /// User ID the token was issued to.
    pub user_id: UserId,
    /// Display name returned at login.
    #[serde(default)]
    pub user_name: String,
}

impl AuthInfo {
    /// Create new auth info.
    pub fn new(token: impl Into<String>, user_id: impl Into<UserId>) -> Self {
        Self {
            token: token.into(),
            user_id: user_id.into(),
            user_name: String::new(),
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.user_name = name.into();
        self
    }

    /// Check if auth looks valid.
    pub fn is_valid(&self) -> bool {
        !self.token.is_empty() && !self.user_id.is_empty()
    }

    /// Decode the token's claims. The signature is not checked.
    pub fn claims(&self) -> Result<TokenClaims> {
        let payload = self
            .token
            .split('.')
            .nth(1)
            .ok_or_else(|| Error::parse("token is not a JWT"))?;
        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| Error::parse(format!("token payload: {}", e)))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Check if the token expired at `now`. Tokens without a readable expiry
    /// are treated as live and left to the server.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.claims()
            .ok()
            .and_then(|c| c.expires_at())
            .is_some_and(|exp| exp <= now)
    }
}

/// Claims carried by a board token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
    #[serde(rename = "userName", default)]
    pub user_name: Option<String>,
    /// Expiry as a Unix timestamp.
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TokenClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|e| Utc.timestamp_opt(e, 0).single())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(payload: &str) -> String {
        format!("eyJhbGciOiJIUzI1NiJ9.{}.sig", URL_SAFE_NO_PAD.encode(payload))
    }

    #[test]
    fn test_auth_info_validity() {
        assert!(AuthInfo::new("token123", "hong").is_valid());
        assert!(!AuthInfo::new("", "hong").is_valid());
        assert!(!AuthInfo::new("token123", "").is_valid());
    }

    #[test]
    fn test_claims() {
        let auth = AuthInfo::new(
            token(r#"{"userId":"hong","userName":"Gildong","exp":1700000000}"#),
            "hong",
        );
        let claims = auth.claims().unwrap();
        assert_eq!(claims.user_id.as_deref(), Some("hong"));
        assert_eq!(claims.user_name.as_deref(), Some("Gildong"));

        let before = Utc.timestamp_opt(1_699_999_999, 0).unwrap();
        let after = Utc.timestamp_opt(1_700_000_001, 0).unwrap();
        assert!(!auth.is_expired(before));
        assert!(auth.is_expired(after));
    }

    #[test]
    fn test_opaque_token() {
        let auth = AuthInfo::new("opaque", "hong");
        assert!(auth.claims().is_err());
        assert!(!auth.is_expired(Utc::now()));
    }
}
