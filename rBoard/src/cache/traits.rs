//! Storage trait for locally kept data such as drafts.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;

/// Key-value storage backend.
#[async_trait]
pub trait CacheStorage: Send + Sync + std::fmt::Debug {
    /// Get a value by key.
    async fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Set a value with optional TTL.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    /// Remove a value by key. Removing a missing key is not an error.
    async fn remove(&self, key: &str);

    /// Remove every value.
    async fn clear(&self);

    /// Keys starting with a prefix.
    async fn scan_prefix(&self, prefix: &str) -> Vec<String>;
}

/// Typed JSON access on top of [`CacheStorage`].
#[async_trait]
pub trait CacheStorageExt: CacheStorage {
    /// Get a JSON value. Undecodable data reads as missing.
    async fn get_json<T: serde::de::DeserializeOwned + Send>(&self, key: &str) -> Option<T> {
        let data = self.get(key).await?;
        match serde_json::from_slice(&data) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("discarding unreadable cache entry {}: {}", key, e);
                None
            }
        }
    }

    /// Store a value as JSON.
    async fn set_json<T: serde::Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<()> {
        let data = serde_json::to_vec(value)?;
        self.set(key, &data, ttl).await
    }
}

impl<T: CacheStorage + ?Sized> CacheStorageExt for T {}
