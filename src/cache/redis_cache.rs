//! Redis-backed shared tier.

use super::distributed::{CacheError, DistributedCache, NullCache};
use super::key::CacheKey;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::RedisResult;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(2);

/// Keys fetched per SCAN round trip when deleting by prefix.
const SCAN_BATCH: usize = 200;

pub struct RedisCache {
    conn: ConnectionManager,
    op_timeout: Duration,
}

impl RedisCache {
    /// Connect eagerly; the first round trip must succeed within `op_timeout`.
    pub async fn connect(url: &str, op_timeout: Duration) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let conn = match tokio::time::timeout(op_timeout, ConnectionManager::new(client)).await {
            Ok(conn) => conn?,
            Err(_) => return Err(CacheError::Timeout(op_timeout)),
        };
        Ok(Self { conn, op_timeout })
    }

    /// Resolve the shared tier at startup. A missing URL or a failed first connection yields
    /// [`NullCache`], so the process still starts and runs memory-only.
    pub async fn connect_or_null(url: Option<&str>, op_timeout: Duration) -> Arc<dyn DistributedCache> {
        let Some(url) = url.filter(|u| !u.trim().is_empty()) else {
            info!("no distributed cache configured; running with in-process cache only");
            return Arc::new(NullCache::new());
        };
        match Self::connect(url, op_timeout).await {
            Ok(cache) => {
                info!(backend = "redis", "distributed cache connected");
                Arc::new(cache)
            }
            Err(e) => {
                warn!(backend = "redis", error = %e, "distributed cache unreachable at startup; falling back to in-process cache only");
                Arc::new(NullCache::new())
            }
        }
    }

    async fn bounded<T>(&self, fut: impl Future<Output = RedisResult<T>>) -> Result<T, CacheError> {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(r) => r.map_err(CacheError::from),
            Err(_) => Err(CacheError::Timeout(self.op_timeout)),
        }
    }

    async fn try_delete_by_prefix(&self, prefix: &str) -> Result<u64, CacheError> {
        let pattern = format!("{}*", escape_glob(prefix));
        let mut conn = self.conn.clone();
        let mut cursor: u64 = 0;
        let mut deleted: u64 = 0;

        loop {
            let mut scan = redis::cmd("SCAN");
            scan.arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH);
            let (next, keys): (u64, Vec<String>) =
                self.bounded(scan.query_async::<_, (u64, Vec<String>)>(&mut conn)).await?;

            if !keys.is_empty() {
                let mut del = redis::cmd("DEL");
                del.arg(&keys);
                deleted += self.bounded(del.query_async::<_, u64>(&mut conn)).await?;
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        Ok(deleted)
    }
}

#[async_trait]
impl DistributedCache for RedisCache {
    async fn get(&self, key: &CacheKey) -> Option<String> {
        let mut conn = self.conn.clone();
        let mut cmd = redis::cmd("GET");
        cmd.arg(key.as_str());
        match self.bounded(cmd.query_async::<_, Option<String>>(&mut conn)).await {
            Ok(value) => value,
            Err(e) => {
                warn!(backend = "redis", operation = "get", error = %e, "distributed cache read failed; treating as miss");
                None
            }
        }
    }

    async fn set(&self, key: &CacheKey, value: &str, ttl: Duration) {
        let mut conn = self.conn.clone();
        let mut cmd = redis::cmd("SETEX");
        cmd.arg(key.as_str()).arg(ttl.as_secs().max(1)).arg(value);
        if let Err(e) = self.bounded(cmd.query_async::<_, ()>(&mut conn)).await {
            warn!(backend = "redis", operation = "setex", error = %e, "distributed cache write failed; skipped");
        }
    }

    async fn delete_by_prefix(&self, prefix: &str) -> u64 {
        match self.try_delete_by_prefix(prefix).await {
            Ok(n) => {
                debug!(backend = "redis", prefix, deleted = n, "distributed cache entries removed");
                n
            }
            Err(e) => {
                warn!(backend = "redis", operation = "delete_by_prefix", error = %e, "distributed cache invalidation failed");
                0
            }
        }
    }

    async fn is_reachable(&self) -> bool {
        let mut conn = self.conn.clone();
        let cmd = redis::cmd("PING");
        self.bounded(cmd.query_async::<_, String>(&mut conn)).await.is_ok()
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

/// Escape Redis glob metacharacters so a literal prefix matches only itself.
fn escape_glob(prefix: &str) -> String {
    let mut out = String::with_capacity(prefix.len());
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{spawn_flaky_redis, FlakyRedis};

    #[test]
    fn test_escape_glob() {
        assert_eq!(escape_glob("translation:"), "translation:");
        assert_eq!(escape_glob("a*b?[c]"), "a\\*b\\?\\[c\\]");
    }

    #[tokio::test]
    async fn test_missing_url_yields_null_cache() {
        let cache = RedisCache::connect_or_null(None, DEFAULT_OP_TIMEOUT).await;
        assert_eq!(cache.name(), "null");
        let cache = RedisCache::connect_or_null(Some("  "), DEFAULT_OP_TIMEOUT).await;
        assert_eq!(cache.name(), "null");
    }

    #[tokio::test]
    async fn test_invalid_url_yields_null_cache() {
        let cache = RedisCache::connect_or_null(Some("not-a-redis-url"), DEFAULT_OP_TIMEOUT).await;
        assert_eq!(cache.name(), "null");
        assert!(!cache.is_reachable().await);
    }

    fn sample_key() -> CacheKey {
        crate::cache::CacheKeyGenerator::new()
            .generate("Hello", &crate::language::TargetLanguage::parse("ko").unwrap())
    }

    #[tokio::test]
    async fn test_stalled_server_degrades_within_op_timeout() {
        let url = spawn_flaky_redis(FlakyRedis::Stall).await;
        let op_timeout = Duration::from_millis(200);
        let cache = RedisCache::connect(&url, op_timeout)
            .await
            .expect("handshake is answered");
        let key = sample_key();

        let started = std::time::Instant::now();
        assert_eq!(cache.get(&key).await, None);
        cache.set(&key, "안녕하세요", Duration::from_secs(60)).await;
        assert_eq!(cache.delete_by_prefix("translation:").await, 0);
        // three bounded operations, none of them waiting on the server
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_server_errors_degrade_to_miss_and_no_op() {
        let url = spawn_flaky_redis(FlakyRedis::Reject).await;
        let cache = RedisCache::connect(&url, DEFAULT_OP_TIMEOUT)
            .await
            .expect("handshake is answered");
        let key = sample_key();

        cache.set(&key, "안녕하세요", Duration::from_secs(60)).await;
        assert_eq!(cache.get(&key).await, None);
        assert_eq!(cache.delete_by_prefix("translation:").await, 0);
        assert!(cache.is_reachable().await);
        assert_eq!(cache.name(), "redis");
    }

    #[tokio::test]
    #[ignore = "requires a Redis server; set REDIS_URL and run with --ignored"]
    async fn test_roundtrip_against_live_redis() {
        let Ok(url) = std::env::var("REDIS_URL") else {
            eprintln!("REDIS_URL not set, skipping live redis test");
            return;
        };
        let cache = RedisCache::connect(&url, DEFAULT_OP_TIMEOUT).await.expect("connect");
        let keys = crate::cache::CacheKeyGenerator::new().with_namespace("transcache-test");
        let key = keys.generate("Hello", &crate::language::TargetLanguage::parse("ko").unwrap());

        cache.set(&key, "안녕하세요", Duration::from_secs(30)).await;
        assert_eq!(cache.get(&key).await.as_deref(), Some("안녕하세요"));
        assert!(cache.delete_by_prefix(&keys.prefix()).await >= 1);
        assert_eq!(cache.get(&key).await, None);
    }
}
