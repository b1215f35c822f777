//! Shared cache tier contract.

use super::key::CacheKey;
use async_trait::async_trait;
use std::time::Duration;

/// Errors raised inside a distributed cache backend.
///
/// These stay on the backend side of [`DistributedCache`]: the trait methods log them and
/// degrade to a miss / no-op. They only surface from explicit constructors such as
/// [`super::RedisCache::connect`].
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Cache operation timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

/// Best-effort key/value store shared between processes.
///
/// Implementations must never fail the caller: connectivity problems are logged and
/// reported as a miss (`None`), a skipped write, or zero deleted keys.
#[async_trait]
pub trait DistributedCache: Send + Sync {
    async fn get(&self, key: &CacheKey) -> Option<String>;

    async fn set(&self, key: &CacheKey, value: &str, ttl: Duration);

    /// Remove every key starting with `prefix`, returning how many were deleted.
    async fn delete_by_prefix(&self, prefix: &str) -> u64;

    async fn is_reachable(&self) -> bool;

    fn name(&self) -> &'static str;
}

/// Stand-in used when no shared store is configured or reachable at startup.
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DistributedCache for NullCache {
    async fn get(&self, _: &CacheKey) -> Option<String> {
        None
    }
    async fn set(&self, _: &CacheKey, _: &str, _: Duration) {}
    async fn delete_by_prefix(&self, _: &str) -> u64 {
        0
    }
    async fn is_reachable(&self) -> bool {
        false
    }
    fn name(&self) -> &'static str {
        "null"
    }
}
