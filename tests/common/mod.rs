//! Shared fakes for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use transcache::cache::{CacheKey, DistributedCache};
use transcache::gateway::TranslationProvider;
use transcache::language::TargetLanguage;
use transcache::{Error, TranslationClient, TranslationConfig};

/// Renders `text[TARGET]`; fails every attempt for texts in `failing`.
#[derive(Default)]
pub struct CountingProvider {
    pub failing: HashSet<String>,
    calls: AtomicUsize,
}

impl CountingProvider {
    pub fn failing_on(texts: &[&str]) -> Self {
        Self {
            failing: texts.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslationProvider for CountingProvider {
    async fn translate(&self, text: &str, target: &TargetLanguage) -> transcache::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(text) {
            return Err(Error::provider(format!("upstream refused '{text}'")));
        }
        Ok(format!("{text}[{target}]"))
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

/// Shared store kept in a plain map, visible to every client built on it.
#[derive(Default)]
pub struct SharedMap {
    entries: Mutex<HashMap<String, String>>,
}

impl SharedMap {
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl DistributedCache for SharedMap {
    async fn get(&self, key: &CacheKey) -> Option<String> {
        self.entries.lock().unwrap().get(key.as_str()).cloned()
    }

    async fn set(&self, key: &CacheKey, value: &str, _ttl: Duration) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.as_str().to_string(), value.to_string());
    }

    async fn delete_by_prefix(&self, prefix: &str) -> u64 {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|k, _| !k.starts_with(prefix));
        (before - entries.len()) as u64
    }

    async fn is_reachable(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "shared-map"
    }
}

/// Config with no retry pause and no pause between batch groups.
pub fn fast_config() -> TranslationConfig {
    let mut cfg = TranslationConfig::default();
    cfg.gateway.base_delay_ms = 0;
    cfg.batch.group_delay_ms = 0;
    cfg
}

pub async fn client_with(
    provider: Arc<CountingProvider>,
    shared: Arc<SharedMap>,
) -> TranslationClient {
    TranslationClient::builder()
        .config(fast_config())
        .provider(provider)
        .distributed_cache(shared)
        .build()
        .await
        .expect("client builds")
}
