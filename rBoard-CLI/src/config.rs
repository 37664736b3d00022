//! Configuration management for the rBoard CLI.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use rboard::{cache::FileCache, AuthInfo, BoardClient};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

/// Base URL given on the command line, which wins over the config file.
static BASE_URL_OVERRIDE: OnceLock<String> = OnceLock::new();

/// CLI configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Board API base URL.
    pub base_url: Option<String>,
    /// Authentication credentials.
    pub auth: Option<AuthConfig>,
    /// Remembered login name.
    pub remember: Option<RememberConfig>,
}

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Access token.
    pub token: String,
    /// User ID.
    pub user_id: String,
    /// Display name.
    #[serde(default)]
    pub user_name: String,
}

impl AuthConfig {
    fn to_auth(&self) -> AuthInfo {
        AuthInfo::new(&self.token, self.user_id.as_str()).with_name(&self.user_name)
    }
}

impl From<AuthInfo> for AuthConfig {
    fn from(auth: AuthInfo) -> Self {
        Self {
            token: auth.token,
            user_id: auth.user_id.0,
            user_name: auth.user_name,
        }
    }
}

/// "Remember me" settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RememberConfig {
    pub user_id: String,
}

impl Config {
    /// Base URL to use: command line, then config file, then the default.
    pub fn base_url(&self) -> String {
        BASE_URL_OVERRIDE
            .get()
            .cloned()
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| rboard::client::DEFAULT_BASE_URL.to_owned())
    }

    /// Remembered user ID, if any.
    pub fn remembered_user(&self) -> Option<&str> {
        self.remember.as_ref().map(|r| r.user_id.as_str())
    }
}

/// Override the base URL for this process.
pub fn set_base_url(url: String) {
    let _ = BASE_URL_OVERRIDE.set(url);
}

/// Directory holding the executable, the config file and drafts.
fn exe_dir() -> Result<PathBuf> {
    let exe_path = env::current_exe().context("Could not determine executable path")?;
    let exe_dir = exe_path
        .parent()
        .context("Could not determine executable directory")?;

    Ok(exe_dir.to_path_buf())
}

/// Get the configuration file path.
pub fn config_path() -> Result<PathBuf> {
    Ok(exe_dir()?.join("rboard.toml"))
}

/// Get the drafts directory.
pub fn drafts_dir() -> Result<PathBuf> {
    Ok(exe_dir()?.join("drafts"))
}

/// Load configuration from file.
pub fn load_config() -> Result<Config> {
    let path = config_path()?;

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path).context("Failed to read config file")?;

    toml::from_str(&content).context("Failed to parse config file")
}

/// Save configuration to file.
pub fn save_config(config: &Config) -> Result<()> {
    let path = config_path()?;
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(&path, content).context("Failed to write config file")?;

    Ok(())
}

fn client_builder(config: &Config) -> Result<rboard::BoardClientBuilder> {
    let drafts = FileCache::new(drafts_dir()?).context("Failed to open drafts directory")?;

    Ok(BoardClient::builder()
        .base_url(config.base_url())
        .cache(Arc::new(drafts)))
}

/// Build a board client from the current configuration.
pub fn build_client() -> Result<BoardClient> {
    let config = load_config()?;

    let mut builder = client_builder(&config)?;

    if let Some(auth) = &config.auth {
        builder = builder.with_auth(auth.to_auth());
    }

    builder.build().context("Failed to build board client")
}

/// Build a board client that requires authentication.
pub fn build_authed_client() -> Result<BoardClient> {
    let config = load_config()?;

    let auth = config
        .auth
        .as_ref()
        .context("Authentication required. Run 'rboard auth login' first.")?
        .to_auth();

    if auth.is_expired(Utc::now()) {
        bail!("Session expired. Run 'rboard auth login' again.");
    }

    client_builder(&config)?
        .with_auth(auth)
        .build()
        .context("Failed to build board client")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_roundtrip() {
        let config = Config {
            base_url: Some("http://board.local/api/".into()),
            auth: Some(AuthConfig {
                token: "t".into(),
                user_id: "hong".into(),
                user_name: "Gildong".into(),
            }),
            remember: Some(RememberConfig {
                user_id: "hong".into(),
            }),
        };

        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.remembered_user(), Some("hong"));
        assert_eq!(back.auth.unwrap().user_name, "Gildong");
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.auth.is_none());
        assert_eq!(config.remembered_user(), None);
    }

    #[test]
    fn test_auth_config_from_info() {
        let info = AuthInfo::new("tok", "kim").with_name("Kim");
        let config = AuthConfig::from(info);
        assert_eq!(config.user_id, "kim");
        assert_eq!(config.to_auth().user_name, "Kim");
    }
}
