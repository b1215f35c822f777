//! In-process LRU tier.

use super::key::CacheKey;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

pub const DEFAULT_CAPACITY: usize = 1000;

struct CacheEntry {
    value: String,
    stored_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() > ttl
    }
}

/// Bounded, recency-ordered store with lazy TTL expiry.
///
/// Reads and writes both move an entry to the most-recently-used position; inserting into a
/// full cache evicts the least-recently-used entry. Expired entries are dropped when read,
/// there is no background sweep. LRU promotion and eviction happen under one mutex, so
/// `len() <= capacity` holds on a multi-threaded runtime too.
pub struct MemoryCache {
    entries: Mutex<LruCache<String, CacheEntry>>,
    ttl: Duration,
}

impl MemoryCache {
    /// A capacity of zero is clamped to one.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<String> {
        let mut entries = self.entries.lock();
        let expired = match entries.get(key.as_str()) {
            Some(entry) if !entry.is_expired(self.ttl) => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.pop(key.as_str());
        }
        None
    }

    pub fn set(&self, key: &CacheKey, value: impl Into<String>) {
        self.entries.lock().put(
            key.as_str().to_string(),
            CacheEntry {
                value: value.into(),
                stored_at: Instant::now(),
            },
        );
    }

    pub fn clear(&self) -> usize {
        let mut entries = self.entries.lock();
        let removed = entries.len();
        entries.clear();
        removed
    }

    /// Number of stored entries, including ones that expired but were not read since.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, Duration::from_secs(24 * 3600))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheKeyGenerator;
    use crate::language::TargetLanguage;

    fn key(text: &str) -> CacheKey {
        CacheKeyGenerator::new().generate(text, &TargetLanguage::parse("ko").unwrap())
    }

    #[test]
    fn test_get_after_set() {
        let cache = MemoryCache::new(4, Duration::from_secs(60));
        cache.set(&key("a"), "A");
        assert_eq!(cache.get(&key("a")), Some("A".to_string()));
        assert_eq!(cache.get(&key("b")), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_overflow_evicts_least_recently_used() {
        let cache = MemoryCache::new(3, Duration::from_secs(60));
        cache.set(&key("a"), "A");
        cache.set(&key("b"), "B");
        cache.set(&key("c"), "C");
        cache.set(&key("d"), "D");

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get(&key("a")), None);
        assert!(cache.get(&key("b")).is_some());
        assert!(cache.get(&key("c")).is_some());
        assert!(cache.get(&key("d")).is_some());
    }

    #[test]
    fn test_read_protects_entry_from_eviction() {
        let cache = MemoryCache::new(3, Duration::from_secs(60));
        cache.set(&key("a"), "A");
        cache.set(&key("b"), "B");
        cache.set(&key("c"), "C");

        // touching "a" makes "b" the eviction candidate
        assert!(cache.get(&key("a")).is_some());
        cache.set(&key("d"), "D");

        assert_eq!(cache.get(&key("b")), None);
        assert_eq!(cache.get(&key("a")), Some("A".to_string()));
    }

    #[test]
    fn test_rewrite_refreshes_recency() {
        let cache = MemoryCache::new(2, Duration::from_secs(60));
        cache.set(&key("a"), "A");
        cache.set(&key("b"), "B");
        cache.set(&key("a"), "A2");
        cache.set(&key("c"), "C");

        assert_eq!(cache.get(&key("a")), Some("A2".to_string()));
        assert_eq!(cache.get(&key("b")), None);
    }

    #[test]
    fn test_expired_entry_is_a_miss_and_removed() {
        let cache = MemoryCache::new(4, Duration::from_millis(20));
        cache.set(&key("a"), "A");
        assert_eq!(cache.len(), 1);

        std::thread::sleep(Duration::from_millis(50));

        // expiry is lazy: still counted until something reads it
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key("a")), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_clear() {
        let cache = MemoryCache::new(4, Duration::from_secs(60));
        cache.set(&key("a"), "A");
        cache.set(&key("b"), "B");
        assert_eq!(cache.clear(), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let cache = MemoryCache::new(0, Duration::from_secs(60));
        assert_eq!(cache.capacity(), 1);
        cache.set(&key("a"), "A");
        cache.set(&key("b"), "B");
        assert_eq!(cache.len(), 1);
    }
}
