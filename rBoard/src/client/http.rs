//! HTTP client configuration and request execution.

use bytes::Bytes;
use reqwest::{header, multipart::Form, Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use super::AuthInfo;
use crate::error::{Error, Result};

/// Default board API base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/";

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("rboard/", env!("CARGO_PKG_VERSION"));

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Base URL for API requests.
    pub base_url: String,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Read timeout.
    pub read_timeout: Duration,
    /// Custom user agent.
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(20),
            user_agent: None,
        }
    }
}

impl HttpConfig {
    /// User agent to send.
    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    /// Resolve an API path such as `posts/3` against the base URL.
    /// Absolute URLs pass through.
    pub fn resolve_url(&self, api: &str) -> Result<Url> {
        if api.starts_with("http://") || api.starts_with("https://") {
            return Ok(Url::parse(api)?);
        }

        let mut base = Url::parse(&self.base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(base.join(api.trim_start_matches('/'))?)
    }
}

/// Build a reqwest client with the given configuration.
pub fn build_client(config: &HttpConfig) -> Result<Client> {
    Client::builder()
        .connect_timeout(config.connect_timeout)
        .read_timeout(config.read_timeout)
        .user_agent(config.user_agent())
        .gzip(true)
        .build()
        .map_err(Error::Network)
}

/// HTTP request executor.
pub struct HttpExecutor<'a> {
    client: &'a Client,
    config: &'a HttpConfig,
    auth: Option<&'a AuthInfo>,
}

impl<'a> HttpExecutor<'a> {
    /// Create a new executor. With `auth`, requests carry a bearer token.
    pub fn new(client: &'a Client, config: &'a HttpConfig, auth: Option<&'a AuthInfo>) -> Self {
        Self {
            client,
            config,
            auth,
        }
    }

    /// Build a request with common headers.
    fn build_request(&self, method: Method, api: &str) -> Result<RequestBuilder> {
        let url = self.config.resolve_url(api)?;
        log::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, url)
            .header(header::ACCEPT, "application/json");
        if let Some(auth) = self.auth {
            request = request.bearer_auth(&auth.token);
        }
        Ok(request)
    }

    /// `GET` a JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        api: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let request = self.build_request(Method::GET, api)?.query(query);
        let response = check_status(request.send().await?).await?;
        decode_json(response).await
    }

    /// Send a multipart form and decode the JSON reply.
    pub async fn send_multipart<T: DeserializeOwned>(
        &self,
        method: Method,
        api: &str,
        form: Form,
    ) -> Result<T> {
        let request = self.build_request(method, api)?.multipart(form);
        let response = check_status(request.send().await?).await?;
        decode_json(response).await
    }

    /// Send a request without a body. The reply body is ignored.
    pub async fn send_empty(&self, method: Method, api: &str) -> Result<()> {
        let request = self.build_request(method, api)?;
        check_status(request.send().await?).await?;
        Ok(())
    }

    /// `GET` raw bytes with the reported content type.
    pub async fn get_bytes(&self, api: &str) -> Result<(Bytes, Option<String>)> {
        let request = self.build_request(Method::GET, api)?;
        let response = check_status(request.send().await?).await?;
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = response.bytes().await?;
        Ok((bytes, content_type))
    }
}

/// Turn a non-2xx response into [`Error::Api`].
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_detail(&body)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_owned());
    log::warn!("board API error {}: {}", status.as_u16(), message);
    Err(Error::api(status.as_u16(), message))
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| {
        log::debug!("undecodable body: {}", text);
        Error::parse(format!("unexpected response: {}", e))
    })
}

/// Extract `detail` from an error body.
///
/// The server sends either `{"detail": "message"}` or, for validation
/// failures, `{"detail": [{"loc": [...], "msg": "..."}]}`.
pub(crate) fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Array(items) => {
            let msgs: Vec<String> = items
                .iter()
                .filter_map(|item| {
                    let msg = item.get("msg")?.as_str()?;
                    let field = item
                        .get("loc")
                        .and_then(|l| l.as_array())
                        .and_then(|l| l.last())
                        .and_then(|f| f.as_str());
                    Some(match field {
                        Some(field) => format!("{}: {}", field, msg),
                        None => msg.to_owned(),
                    })
                })
                .collect();
            (!msgs.is_empty()).then(|| msgs.join("; "))
        }
        _ => None,
    }
}
