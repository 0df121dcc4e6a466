#![deny(clippy::all)]

use crate::domain::response::DeleteResponse;
use async_trait::async_trait;
use bytes::Bytes;
use shared::{Result, TtlMs};

// Ports are the pluggable extension points for underlying cache implementations

/// Port for the key/value cache every repository reads through.
///
/// `get` returns `Ok(None)` for an absent or expired key. An `Err` means the
/// transport itself failed; callers treat it the same as a miss.
#[async_trait]
pub trait CacheStore: Send + Sync + 'static {
    async fn get(&self, key: &str) -> Result<Option<Bytes>>;

    /// Overwrite `key`, expiring `ttl` after this call.
    async fn set(&self, key: &str, value: Bytes, ttl: TtlMs) -> Result<()>;

    /// Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<DeleteResponse>;
}
