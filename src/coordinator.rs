//! Cache-then-compute orchestration: memory tier, shared tier, then the provider.

use crate::cache::{CacheKeyGenerator, DistributedCache, MemoryCache};
use crate::gateway::TranslationGateway;
use crate::language::TargetLanguage;
use crate::Result;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoordinatorStats {
    /// Entries held by the memory tier, counting expired ones that have not been read since
    /// (expiry is lazy).
    pub memory_entries: usize,
    pub memory_capacity: usize,
    pub distributed_backend: &'static str,
    pub distributed_reachable: bool,
    pub memory_hits: u64,
    pub distributed_hits: u64,
    pub misses: u64,
    pub provider_calls: u64,
    pub provider_failures: u64,
}

impl CoordinatorStats {
    pub fn hit_ratio(&self) -> f64 {
        let hits = self.memory_hits + self.distributed_hits;
        let total = hits + self.misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClearSummary {
    pub memory_entries_removed: usize,
    pub distributed_entries_removed: u64,
}

struct AtomicStats {
    memory_hits: AtomicU64,
    distributed_hits: AtomicU64,
    misses: AtomicU64,
    provider_calls: AtomicU64,
    provider_failures: AtomicU64,
}

impl AtomicStats {
    fn new() -> Self {
        Self {
            memory_hits: AtomicU64::new(0),
            distributed_hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            provider_calls: AtomicU64::new(0),
            provider_failures: AtomicU64::new(0),
        }
    }
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Process-lifetime service owning both cache tiers and the provider gateway.
///
/// Construct one and share it (`Arc<CacheCoordinator>`) with whatever needs translations.
pub struct CacheCoordinator {
    keys: CacheKeyGenerator,
    memory: MemoryCache,
    distributed: Arc<dyn DistributedCache>,
    gateway: TranslationGateway,
    ttl: Duration,
    stats: AtomicStats,
}

impl CacheCoordinator {
    /// `ttl` is applied to shared-tier writes; the memory tier carries its own.
    pub fn new(
        keys: CacheKeyGenerator,
        memory: MemoryCache,
        distributed: Arc<dyn DistributedCache>,
        gateway: TranslationGateway,
        ttl: Duration,
    ) -> Self {
        Self {
            keys,
            memory,
            distributed,
            gateway,
            ttl,
            stats: AtomicStats::new(),
        }
    }

    /// Translate one string.
    ///
    /// An absent or blank `target` returns `text` untouched. An unsupported `target` fails
    /// before any lookup. Provider failures (after the gateway's retries) propagate.
    pub async fn translate(&self, text: &str, target: Option<&str>) -> Result<String> {
        match TargetLanguage::parse_optional(target)? {
            None => Ok(text.to_string()),
            Some(lang) => self.translate_to(text, &lang).await,
        }
    }

    /// Same as [`translate`](Self::translate) for a target that was normalized already.
    pub async fn translate_to(&self, text: &str, target: &TargetLanguage) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let key = self.keys.generate(text, target);

        if let Some(hit) = self.memory.get(&key) {
            AtomicStats::bump(&self.stats.memory_hits);
            debug!(tier = "memory", key = %key, "translation cache hit");
            return Ok(hit);
        }

        if let Some(hit) = self.distributed.get(&key).await {
            AtomicStats::bump(&self.stats.distributed_hits);
            debug!(tier = self.distributed.name(), key = %key, "translation cache hit");
            self.memory.set(&key, hit.clone());
            return Ok(hit);
        }

        AtomicStats::bump(&self.stats.misses);
        AtomicStats::bump(&self.stats.provider_calls);
        let translated = match self.gateway.call(text, target).await {
            Ok(t) => t,
            Err(e) => {
                AtomicStats::bump(&self.stats.provider_failures);
                return Err(e);
            }
        };

        self.memory.set(&key, translated.clone());
        self.distributed.set(&key, &translated, self.ttl).await;
        Ok(translated)
    }

    pub async fn stats(&self) -> CoordinatorStats {
        CoordinatorStats {
            memory_entries: self.memory.len(),
            memory_capacity: self.memory.capacity(),
            distributed_backend: self.distributed.name(),
            distributed_reachable: self.distributed.is_reachable().await,
            memory_hits: self.stats.memory_hits.load(Ordering::Relaxed),
            distributed_hits: self.stats.distributed_hits.load(Ordering::Relaxed),
            misses: self.stats.misses.load(Ordering::Relaxed),
            provider_calls: self.stats.provider_calls.load(Ordering::Relaxed),
            provider_failures: self.stats.provider_failures.load(Ordering::Relaxed),
        }
    }

    /// Empty the memory tier and drop every shared-tier key under this namespace.
    pub async fn clear(&self) -> ClearSummary {
        let memory_entries_removed = self.memory.clear();
        let distributed_entries_removed = self.distributed.delete_by_prefix(&self.keys.prefix()).await;
        info!(
            memory_entries_removed,
            distributed_entries_removed,
            namespace = self.keys.namespace(),
            "translation cache cleared"
        );
        ClearSummary {
            memory_entries_removed,
            distributed_entries_removed,
        }
    }

    pub fn memory(&self) -> &MemoryCache {
        &self.memory
    }

    pub fn keys(&self) -> &CacheKeyGenerator {
        &self.keys
    }
}
