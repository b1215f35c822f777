//! Two-tier translation cache.
//!
//! # Translation Caching Module
//!
//! Provider calls are slow, rate limited and billed per call, so every translated string is
//! kept in two places:
//!
//! | Tier | Type | Scope |
//! |------|------|-------|
//! | L1 | [`MemoryCache`] | Process-local, bounded LRU with lazy TTL expiry |
//! | L2 | [`DistributedCache`] | Shared between processes (e.g. [`RedisCache`]), optional |
//!
//! Both tiers are addressed by a [`CacheKey`] produced by [`CacheKeyGenerator`] from the
//! source text and the normalized target language.
//!
//! The L2 tier is best-effort. When it is absent or unreachable, [`NullCache`] stands in and
//! the layer keeps working on L1 alone; L2 errors never reach the caller.
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//! use transcache::cache::{CacheKeyGenerator, MemoryCache};
//! use transcache::language::TargetLanguage;
//!
//! let keys = CacheKeyGenerator::new();
//! let l1 = MemoryCache::new(1000, Duration::from_secs(24 * 3600));
//!
//! let key = keys.generate("Hello", &TargetLanguage::parse("ko").unwrap());
//! l1.set(&key, "안녕하세요");
//! assert_eq!(l1.get(&key).as_deref(), Some("안녕하세요"));
//! ```

mod distributed;
mod key;
mod memory;
mod redis_cache;

pub use distributed::{CacheError, DistributedCache, NullCache};
pub use key::{CacheKey, CacheKeyGenerator, DEFAULT_NAMESPACE};
pub use memory::{MemoryCache, DEFAULT_CAPACITY};
pub use redis_cache::{RedisCache, DEFAULT_OP_TIMEOUT};
