//! Cache doubles for unit tests.

use crate::domain::response::DeleteResponse;
use crate::persistence::SledStore;
use crate::ports::CacheStore;
use async_trait::async_trait;
use bytes::Bytes;
use shared::{Error, Result, TtlMs};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tempfile::TempDir;
use tokio::sync::Mutex;

/// In-memory cache that honours per-entry TTL.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (Bytes, Instant)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, key: &str) -> bool {
        matches!(self.get(key).await, Ok(Some(_)))
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        let entries = self.entries.lock().await;
        Ok(entries
            .get(key)
            .filter(|(_, expires_at)| Instant::now() < *expires_at)
            .map(|(value, _)| value.clone()))
    }

    async fn set(&self, key: &str, value: Bytes, ttl: TtlMs) -> Result<()> {
        let expires_at = Instant::now() + ttl.as_duration();
        self.entries
            .lock()
            .await
            .insert(key.to_string(), (value, expires_at));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<DeleteResponse> {
        let existed = self.entries.lock().await.remove(key).is_some();
        Ok(DeleteResponse::new(existed))
    }
}

/// Cache whose transport is permanently down.
pub struct FailingCache;

#[async_trait]
impl CacheStore for FailingCache {
    async fn get(&self, _key: &str) -> Result<Option<Bytes>> {
        Err(Error::Unavailable("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _value: Bytes, _ttl: TtlMs) -> Result<()> {
        Err(Error::Unavailable("connection refused".to_string()))
    }

    async fn delete(&self, _key: &str) -> Result<DeleteResponse> {
        Err(Error::Unavailable("connection refused".to_string()))
    }
}

/// A sled store in a temp dir; keep the `TempDir` alive for the test.
pub fn temp_store() -> (TempDir, Arc<SledStore>) {
    let temp_dir = TempDir::new().unwrap();
    let store = SledStore::open(temp_dir.path().join("catalog.sled")).unwrap();
    (temp_dir, Arc::new(store))
}
