use crate::domain::Fetched;
use crate::error::CatalogError;
use crate::ports::CacheStore;
use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::TtlMs;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

/// Cache-aside access shared by every resource repository.
///
/// Cache failures never reach the caller: a failed `get` reads from the
/// backing store, a failed `set` or `delete` is logged and dropped.
#[derive(Clone)]
pub struct CacheAside {
    cache: Arc<dyn CacheStore>,
}

impl CacheAside {
    pub fn new(cache: Arc<dyn CacheStore>) -> Self {
        Self { cache }
    }

    /// Return the cached value for `key`, or run `load` and cache its result.
    ///
    /// A loader error (including `NotFound`) is returned as-is and leaves the
    /// cache untouched, so absence is never cached.
    pub async fn read_through<T, F, Fut>(
        &self,
        key: &str,
        ttl: TtlMs,
        load: F,
    ) -> Result<Fetched<T>, CatalogError>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, CatalogError>> + Send,
    {
        self.read_through_checked(key, ttl, load, |_| Ok(())).await
    }

    /// Like `read_through`, but `check` must accept the value before it is
    /// returned. A loaded value that fails `check` is not cached.
    pub async fn read_through_checked<T, F, Fut, C>(
        &self,
        key: &str,
        ttl: TtlMs,
        load: F,
        check: C,
    ) -> Result<Fetched<T>, CatalogError>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, CatalogError>> + Send,
        C: FnOnce(&T) -> Result<(), CatalogError> + Send,
    {
        if let Some(value) = self.lookup::<T>(key).await {
            check(&value)?;
            return Ok(Fetched::cached(value));
        }

        let value = load().await?;
        check(&value)?;
        self.populate(key, &value, ttl).await;
        Ok(Fetched::stored(value))
    }

    /// Delete every key in `keys`.
    pub async fn invalidate<I, S>(&self, keys: I)
    where
        I: IntoIterator<Item = S> + Send,
        I::IntoIter: Send,
        S: AsRef<str> + Send,
    {
        for key in keys {
            let key = key.as_ref();
            match self.cache.delete(key).await {
                Ok(response) => debug!("invalidated '{}' (existed: {})", key, response.deleted),
                Err(e) => warn!("failed to invalidate '{}': {}", key, e),
            }
        }
    }

    async fn lookup<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.cache.get(key).await {
            Ok(Some(payload)) => match serde_json::from_slice(&payload) {
                Ok(value) => {
                    debug!("cache hit for '{}'", key);
                    Some(value)
                }
                Err(e) => {
                    warn!("discarding undecodable cache entry '{}': {}", key, e);
                    None
                }
            },
            Ok(None) => {
                debug!("cache miss for '{}'", key);
                None
            }
            Err(e) => {
                warn!("cache read failed for '{}', using backing store: {}", key, e);
                None
            }
        }
    }

    async fn populate<T: Serialize>(&self, key: &str, value: &T, ttl: TtlMs) {
        let payload = match serde_json::to_vec(value) {
            Ok(payload) => Bytes::from(payload),
            Err(e) => {
                warn!("not caching '{}': {}", key, e);
                return;
            }
        };

        if let Err(e) = self.cache.set(key, payload, ttl).await {
            warn!("cache write failed for '{}': {}", key, e);
        }
    }
}
