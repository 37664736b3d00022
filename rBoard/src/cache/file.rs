//! File-backed storage, one JSON file per key.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::traits::CacheStorage;
use crate::error::{Error, Result};

const FILE_EXT: &str = "json";

/// Stores each entry as `<dir>/<key>.json`.
///
/// ```text
/// drafts/
/// ├── post_draft_new.json
/// └── post_draft_12.json
/// ```
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires_at: Option<DateTime<Utc>>,
    data: String,
}

impl Envelope {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Utc::now() > at)
    }
}

impl FileCache {
    /// Open a storage directory, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory entries are stored in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File an entry is stored in. Characters unsafe in file names are replaced.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.{}", name, FILE_EXT))
    }

    async fn read_envelope(path: &Path) -> Option<Envelope> {
        let raw = match tokio::fs::read(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                log::warn!("cannot read {}: {}", path.display(), e);
                return None;
            }
        };
        match serde_json::from_slice::<Envelope>(&raw) {
            Ok(envelope) => Some(envelope),
            Err(e) => {
                log::warn!("ignoring malformed {}: {}", path.display(), e);
                None
            }
        }
    }

    async fn remove_path(path: &Path) {
        match tokio::fs::remove_file(path).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("cannot remove {}: {}", path.display(), e),
        }
    }

    async fn entries(&self) -> Vec<(PathBuf, Envelope)> {
        let mut out = Vec::new();
        let mut dir = match tokio::fs::read_dir(&self.dir).await {
            Ok(dir) => dir,
            Err(e) => {
                log::warn!("cannot list {}: {}", self.dir.display(), e);
                return out;
            }
        };
        while let Ok(Some(entry)) = dir.next_entry().await {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(FILE_EXT) {
                continue;
            }
            if let Some(envelope) = Self::read_envelope(&path).await {
                out.push((path, envelope));
            }
        }
        out
    }
}

#[async_trait]
impl CacheStorage for FileCache {
    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        let path = self.path_for(key);
        let envelope = Self::read_envelope(&path).await?;
        if envelope.key != key {
            return None;
        }
        if envelope.is_expired() {
            Self::remove_path(&path).await;
            return None;
        }
        STANDARD.decode(envelope.data).ok()
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let expires_at = match ttl {
            Some(ttl) => Some(
                Utc::now()
                    + chrono::Duration::from_std(ttl)
                        .map_err(|e| Error::Cache(format!("ttl out of range: {}", e)))?,
            ),
            None => None,
        };
        let envelope = Envelope {
            key: key.to_owned(),
            expires_at,
            data: STANDARD.encode(value),
        };
        let path = self.path_for(key);
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(&envelope)?).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) {
        Self::remove_path(&self.path_for(key)).await;
    }

    async fn clear(&self) {
        for (path, _) in self.entries().await {
            Self::remove_path(&path).await;
        }
    }

    async fn scan_prefix(&self, prefix: &str) -> Vec<String> {
        self.entries()
            .await
            .into_iter()
            .filter(|(_, e)| e.key.starts_with(prefix) && !e.is_expired())
            .map(|(_, e)| e.key)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path()).unwrap();
        cache.set("post_draft_new", b"{\"a\":1}", None).await.unwrap();
        assert!(cache.path_for("post_draft_new").exists());

        let reopened = FileCache::new(dir.path()).unwrap();
        assert_eq!(reopened.get("post_draft_new").await, Some(b"{\"a\":1}".to_vec()));
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path().join("nested")).unwrap();
        cache.set("a", b"1", None).await.unwrap();
        cache.set("b", b"2", None).await.unwrap();

        cache.remove("a").await;
        cache.remove("a").await;
        assert!(cache.get("a").await.is_none());

        cache.clear().await;
        assert!(cache.get("b").await.is_none());
    }

    #[tokio::test]
    async fn test_scan_prefix_and_unsafe_keys() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path()).unwrap();
        cache.set("post_draft_1", b"x", None).await.unwrap();
        cache.set("post_draft_new", b"y", None).await.unwrap();
        cache.set("../escape", b"z", None).await.unwrap();

        let mut keys = cache.scan_prefix("post_draft_").await;
        keys.sort();
        assert_eq!(keys, vec!["post_draft_1", "post_draft_new"]);

        assert!(cache.path_for("../escape").starts_with(dir.path()));
        assert_eq!(cache.get("../escape").await, Some(b"z".to_vec()));
    }

    #[tokio::test]
    async fn test_expired_entries() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path()).unwrap();
        cache
            .set("k", b"v", Some(Duration::from_millis(20)))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(cache.get("k").await.is_none());
        assert!(!cache.path_for("k").exists());
    }

    #[tokio::test]
    async fn test_malformed_file_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path()).unwrap();
        std::fs::write(cache.path_for("bad"), b"garbage").unwrap();
        assert!(cache.get("bad").await.is_none());
        assert!(cache.scan_prefix("").await.is_empty());
    }
}
