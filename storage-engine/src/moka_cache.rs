use async_trait::async_trait;
use bytes::Bytes;
use catalog::domain::response::DeleteResponse;
use catalog::ports::CacheStore;
use moka::Expiry;
use moka::future::Cache;
use shared::{Result, TtlMs};
use std::fmt::Debug;
use std::time::{Duration, Instant};
use tracing::debug;

/// Cached payload together with the TTL it was written with.
#[derive(Clone, Debug)]
struct CacheValue {
    payload: Bytes,
    ttl: Duration,
}

/// Expires each entry by its own TTL, restarting the clock on overwrite.
struct PerEntryTtl;

impl Expiry<String, CacheValue> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CacheValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CacheValue,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Moka-based cache implementation with per-entry TTL.
///
/// An entry whose age equals its TTL is already expired, so a read at
/// exactly `t` is a miss.
pub struct MokaCache {
    cache: Cache<String, CacheValue>,
}

impl MokaCache {
    /// Create a Moka cache with an optional bound on entry count.
    pub fn new(name: &str, max_entries: Option<u64>) -> Self {
        let mut builder = Cache::builder().name(name).expire_after(PerEntryTtl);

        if let Some(capacity) = max_entries {
            builder = builder.max_capacity(capacity);
        }

        Self {
            cache: builder.build(),
        }
    }

    pub fn new_unbounded(name: &str) -> Self {
        Self::new(name, None)
    }
}

#[async_trait]
impl CacheStore for MokaCache {
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        // Moka filters out expired entries on read, before eviction runs.
        Ok(self.cache.get(key).await.map(|value| value.payload))
    }

    async fn set(&self, key: &str, value: Bytes, ttl: TtlMs) -> Result<()> {
        debug!("caching '{}' for {}ms", key, ttl.0);
        self.cache
            .insert(
                key.to_string(),
                CacheValue {
                    payload: value,
                    ttl: ttl.as_duration(),
                },
            )
            .await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<DeleteResponse> {
        let existed = self.cache.remove(key).await.is_some();
        Ok(DeleteResponse::new(existed))
    }
}

impl Debug for MokaCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaCache")
            .field("entry_count", &self.cache.entry_count())
            .field("weighted_size", &self.cache.weighted_size())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{Duration, sleep};

    const LONG: TtlMs = TtlMs::from_secs(60);

    #[tokio::test]
    async fn test_moka_cache_set_and_get() {
        let cache = MokaCache::new_unbounded("test");

        cache.set("hello", Bytes::from_static(b"world"), LONG).await.unwrap();

        let value = cache.get("hello").await.unwrap();
        assert_eq!(value, Some(Bytes::from_static(b"world")));
    }

    #[tokio::test]
    async fn test_moka_cache_get_nonexistent_is_miss() {
        let cache = MokaCache::new_unbounded("test");

        assert_eq!(cache.get("nonexistent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_moka_cache_delete_is_idempotent() {
        let cache = MokaCache::new_unbounded("test");

        cache.set("key", Bytes::from_static(b"v"), LONG).await.unwrap();

        assert!(cache.delete("key").await.unwrap().deleted);
        assert!(!cache.delete("key").await.unwrap().deleted);
        assert_eq!(cache.get("key").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_moka_cache_overwrite() {
        let cache = MokaCache::new_unbounded("test");

        cache.set("key", Bytes::from_static(b"value1"), LONG).await.unwrap();
        cache.set("key", Bytes::from_static(b"value2"), LONG).await.unwrap();

        assert_eq!(
            cache.get("key").await.unwrap(),
            Some(Bytes::from_static(b"value2"))
        );
    }

    #[tokio::test]
    async fn test_moka_cache_per_entry_ttl() {
        let cache = MokaCache::new_unbounded("test");

        cache.set("short", Bytes::from_static(b"s"), TtlMs(100)).await.unwrap();
        cache.set("long", Bytes::from_static(b"l"), LONG).await.unwrap();

        // Hit before t
        assert!(cache.get("short").await.unwrap().is_some());

        sleep(Duration::from_millis(200)).await;

        // Miss after t, other entries unaffected
        assert_eq!(cache.get("short").await.unwrap(), None);
        assert!(cache.get("long").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_moka_cache_overwrite_resets_ttl() {
        let cache = MokaCache::new_unbounded("test");

        cache.set("key", Bytes::from_static(b"v1"), TtlMs(100)).await.unwrap();
        cache.set("key", Bytes::from_static(b"v2"), LONG).await.unwrap();

        sleep(Duration::from_millis(200)).await;

        assert_eq!(
            cache.get("key").await.unwrap(),
            Some(Bytes::from_static(b"v2"))
        );
    }

    #[tokio::test]
    async fn test_moka_cache_bounded() {
        let cache = MokaCache::new("test", Some(2)); // Max 2 entries

        for key in ["key1", "key2", "key3"] {
            cache.set(key, Bytes::from_static(b"v"), LONG).await.unwrap();
        }

        // Let pending maintenance apply the bound
        cache.cache.run_pending_tasks().await;

        assert!(cache.cache.entry_count() <= 2, "Cache should have at most 2 entries");
    }
}
