//! In-memory storage.

use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::{Duration, Instant},
};

use super::traits::CacheStorage;
use crate::error::Result;

/// In-memory storage with optional TTL. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryCache {
    data: RwLock<HashMap<String, CacheEntry>>,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    data: Vec<u8>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn new(data: Vec<u8>, ttl: Option<Duration>) -> Self {
        Self {
            data,
            expires_at: ttl.map(|d| Instant::now() + d),
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|e| Instant::now() > e)
    }
}

impl MemoryCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.read().values().filter(|e| !e.is_expired()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove expired entries.
    pub fn cleanup(&self) {
        self.write().retain(|_, v| !v.is_expired());
    }

    // A poisoned lock still holds a consistent map; every write is a single call.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, CacheEntry>> {
        self.data.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, CacheEntry>> {
        self.data.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl CacheStorage for MemoryCache {
    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.read()
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.data.clone())
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        self.write()
            .insert(key.to_owned(), CacheEntry::new(value.to_vec(), ttl));
        Ok(())
    }

    async fn remove(&self, key: &str) {
        self.write().remove(key);
    }

    async fn clear(&self) {
        self.write().clear();
    }

    async fn scan_prefix(&self, prefix: &str) -> Vec<String> {
        self.read()
            .iter()
            .filter(|(k, v)| k.starts_with(prefix) && !v.is_expired())
            .map(|(k, _)| k.clone())
            .collect()
    }
}
