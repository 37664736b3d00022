//! Login API.

use std::sync::Arc;

use reqwest::{multipart::Form, Method};
use serde::Deserialize;

use crate::{
    client::{AuthInfo, BoardClientInner},
    error::{Error, Result},
    models::UserId,
};

/// API for logging in.
pub struct AuthApi {
    client: Arc<BoardClientInner>,
}

impl AuthApi {
    pub(crate) fn new(client: Arc<BoardClientInner>) -> Self {
        Self { client }
    }

    /// Log in with a user ID and password.
    ///
    /// Wrong credentials come back as [`Error::Api`] with status 401.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResult> {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::invalid("username is required"));
        }
        if password.is_empty() {
            return Err(Error::invalid("password is required"));
        }

        let form = Form::new()
            .text("username", username.to_owned())
            .text("password", password.to_owned());

        let response: LoginResponse = self
            .client
            .executor()
            .send_multipart(Method::POST, "login", form)
            .await?;

        if response.access_token.is_empty() {
            return Err(Error::missing("access_token"));
        }

        log::debug!("logged in as {}", username);
        Ok(LoginResult {
            token: response.access_token,
            token_type: response.token_type,
            user_id: UserId::new(username),
            user_name: response.user_name,
        })
    }
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    access_token: String,
    #[serde(default)]
    token_type: String,
    #[serde(rename = "userName", default)]
    user_name: String,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginResult {
    /// Bearer token.
    pub token: String,
    /// Token type, normally `bearer`.
    pub token_type: String,
    /// The ID that logged in.
    pub user_id: UserId,
    /// Display name.
    pub user_name: String,
}

impl LoginResult {
    /// Credentials for building an authenticated client.
    pub fn into_auth(self) -> AuthInfo {
        AuthInfo::new(self.token, self.user_id).with_name(self.user_name)
    }
}
