//! HTTP client and configuration.

mod auth;
mod http;

pub use auth::{AuthInfo, TokenClaims};
pub use http::{HttpConfig, DEFAULT_BASE_URL, DEFAULT_USER_AGENT};

use crate::api::{AttachmentApi, AuthApi, CommentApi, PostApi};
use crate::cache::{CacheStorage, MemoryCache};
use crate::error::{Error, Result};
use crate::form::DraftStore;
use crate::models::UserId;
use http::{build_client, HttpExecutor};
use std::sync::Arc;
use std::time::Duration;

/// Builder for creating a [`BoardClient`].
pub struct BoardClientBuilder {
    auth: Option<AuthInfo>,
    http_config: HttpConfig,
    cache: Option<Arc<dyn CacheStorage>>,
}

impl std::fmt::Debug for BoardClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardClientBuilder")
            .field("auth", &self.auth.as_ref().map(|a| &a.user_id))
            .field("http_config", &self.http_config)
            .field("cache", &self.cache)
            .finish()
    }
}

impl Default for BoardClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            auth: None,
            http_config: HttpConfig::default(),
            cache: None,
        }
    }

    /// Set authentication.
    pub fn auth(mut self, token: impl Into<String>, user_id: impl Into<UserId>) -> Self {
        self.auth = Some(AuthInfo::new(token, user_id));
        self
    }

    /// Set authentication from AuthInfo.
    pub fn with_auth(mut self, auth: AuthInfo) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Set base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.http_config.base_url = url.into();
        self
    }

    /// Set custom user agent.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.http_config.user_agent = Some(ua.into());
        self
    }

    /// Set connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.http_config.connect_timeout = timeout;
        self
    }

    /// Set read timeout.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.http_config.read_timeout = timeout;
        self
    }

    /// Set draft storage. Defaults to an in-memory store.
    pub fn cache(mut self, storage: Arc<dyn CacheStorage>) -> Self {
        self.cache = Some(storage);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<BoardClient> {
        let http_client = build_client(&self.http_config)?;
        let cache: Arc<dyn CacheStorage> = match self.cache {
            Some(cache) => cache,
            None => Arc::new(MemoryCache::new()),
        };

        Ok(BoardClient {
            inner: Arc::new(BoardClientInner {
                http: http_client,
                config: self.http_config,
                auth: self.auth,
                drafts: DraftStore::new(cache),
            }),
        })
    }
}

/// Internal client state.
pub(crate) struct BoardClientInner {
    pub http: reqwest::Client,
    pub config: HttpConfig,
    pub auth: Option<AuthInfo>,
    pub drafts: DraftStore,
}

impl BoardClientInner {
    /// Get auth info or error.
    pub fn require_auth(&self) -> Result<&AuthInfo> {
        self.auth.as_ref().ok_or(Error::AuthRequired)
    }

    /// Executor that sends the token when one is configured.
    pub fn executor(&self) -> HttpExecutor<'_> {
        HttpExecutor::new(&self.http, &self.config, self.auth.as_ref())
    }

    /// Executor for endpoints that need a token. Fails before any request
    /// is made when there is none.
    pub fn authed(&self) -> Result<HttpExecutor<'_>> {
        let auth = self.require_auth()?;
        Ok(HttpExecutor::new(&self.http, &self.config, Some(auth)))
    }
}

/// Client for interacting with the board.
#[derive(Clone)]
pub struct BoardClient {
    pub(crate) inner: Arc<BoardClientInner>,
}

impl BoardClient {
    /// Create a new client builder.
    pub fn builder() -> BoardClientBuilder {
        BoardClientBuilder::new()
    }

    /// Get the login API.
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.inner.clone())
    }

    /// Get the post API.
    pub fn posts(&self) -> PostApi {
        PostApi::new(self.inner.clone())
    }

    /// Get the comment API.
    pub fn comments(&self) -> CommentApi {
        CommentApi::new(self.inner.clone())
    }

    /// Get the attachment API.
    pub fn attachments(&self) -> AttachmentApi {
        AttachmentApi::new(self.inner.clone())
    }

    /// Get the draft store.
    pub fn drafts(&self) -> &DraftStore {
        &self.inner.drafts
    }

    /// Check if the client is authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.inner.auth.is_some()
    }

    /// Get the current authentication info.
    pub fn auth_info(&self) -> Option<&AuthInfo> {
        self.inner.auth.as_ref()
    }

    /// Get the current user ID if authenticated.
    pub fn current_user_id(&self) -> Option<&UserId> {
        self.inner.auth.as_ref().map(|a| &a.user_id)
    }

    /// Check if `user` is the logged-in user.
    pub fn is_current_user(&self, user: &UserId) -> bool {
        self.current_user_id()
            .is_some_and(|me| !me.is_empty() && me == user)
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &str {
        &self.inner.config.base_url
    }
}

impl std::fmt::Debug for BoardClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardClient")
            .field("authenticated", &self.is_authenticated())
            .field("base_url", &self.inner.config.base_url)
            .finish()
    }
}
