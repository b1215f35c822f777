//! Layer configuration.
//!
//! Defaults match the production policy (1000-entry L1, 24h TTL, 10s attempt deadline,
//! 3 attempts, groups of 10 with 500ms between groups). Values can come from a YAML file,
//! from `TRANSCACHE_*` environment variables, or both (env applied last).

use crate::batch::BatchConfig;
use crate::gateway::GatewayConfig;
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub request_timeout_ms: u64,
    pub pool_max_idle_per_host: usize,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api-free.deepl.com".to_string(),
            api_key: None,
            request_timeout_ms: 30_000,
            pool_max_idle_per_host: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub namespace: String,
    pub memory_capacity: usize,
    pub ttl_secs: u64,
    pub redis_url: Option<String>,
    pub redis_op_timeout_ms: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            namespace: crate::cache::DEFAULT_NAMESPACE.to_string(),
            memory_capacity: crate::cache::DEFAULT_CAPACITY,
            ttl_secs: 24 * 3600,
            redis_url: None,
            redis_op_timeout_ms: 2_000,
        }
    }
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
    pub fn redis_op_timeout(&self) -> Duration {
        Duration::from_millis(self.redis_op_timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub attempt_timeout_ms: u64,
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub fail_fast_on_rejection: bool,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            attempt_timeout_ms: 10_000,
            max_attempts: 3,
            base_delay_ms: 1_000,
            fail_fast_on_rejection: false,
        }
    }
}

impl RetrySettings {
    pub fn to_gateway_config(&self) -> GatewayConfig {
        GatewayConfig::new()
            .with_attempt_timeout(Duration::from_millis(self.attempt_timeout_ms))
            .with_max_attempts(self.max_attempts)
            .with_base_delay(Duration::from_millis(self.base_delay_ms))
            .with_fail_fast_on_rejection(self.fail_fast_on_rejection)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    pub group_size: usize,
    pub group_delay_ms: u64,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            group_size: 10,
            group_delay_ms: 500,
        }
    }
}

impl BatchSettings {
    pub fn to_batch_config(&self) -> BatchConfig {
        BatchConfig::new()
            .with_group_size(self.group_size)
            .with_group_delay(Duration::from_millis(self.group_delay_ms))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub provider: ProviderSettings,
    pub cache: CacheSettings,
    pub gateway: RetrySettings,
    pub batch: BatchSettings,
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.trim().parse::<T>().ok())
}

fn env_string(names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|n| env::var(n).ok())
        .filter(|s| !s.trim().is_empty())
}

impl TranslationConfig {
    /// Defaults overlaid with `TRANSCACHE_*` environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.apply_env_overrides();
        cfg
    }

    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let cfg: Self = serde_yaml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&raw)
    }

    /// Environment variables win over whatever is already set. Unparseable values are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Some(url) = env_string(&["TRANSCACHE_API_URL"]) {
            self.provider.base_url = url;
        }
        if let Some(key) = env_string(&["TRANSCACHE_API_KEY", "DEEPL_API_KEY"]) {
            self.provider.api_key = Some(key);
        }
        if let Some(url) = env_string(&["TRANSCACHE_REDIS_URL", "REDIS_URL"]) {
            self.cache.redis_url = Some(url);
        }
        if let Some(ns) = env_string(&["TRANSCACHE_NAMESPACE"]) {
            self.cache.namespace = ns;
        }
        if let Some(v) = env_parse("TRANSCACHE_MEMORY_CAPACITY") {
            self.cache.memory_capacity = v;
        }
        if let Some(v) = env_parse("TRANSCACHE_CACHE_TTL_SECS") {
            self.cache.ttl_secs = v;
        }
        if let Some(v) = env_parse("TRANSCACHE_ATTEMPT_TIMEOUT_MS") {
            self.gateway.attempt_timeout_ms = v;
        }
        if let Some(v) = env_parse("TRANSCACHE_MAX_ATTEMPTS") {
            self.gateway.max_attempts = v;
        }
        if let Some(v) = env_parse("TRANSCACHE_BASE_DELAY_MS") {
            self.gateway.base_delay_ms = v;
        }
        if let Some(v) = env_parse("TRANSCACHE_FAIL_FAST_ON_REJECTION") {
            self.gateway.fail_fast_on_rejection = v;
        }
        if let Some(v) = env_parse("TRANSCACHE_BATCH_SIZE") {
            self.batch.group_size = v;
        }
        if let Some(v) = env_parse("TRANSCACHE_BATCH_DELAY_MS") {
            self.batch.group_delay_ms = v;
        }
    }

    pub fn validate(&self) -> Result<()> {
        let positive: [(&str, u64); 5] = [
            ("cache.memory_capacity", self.cache.memory_capacity as u64),
            ("cache.ttl_secs", self.cache.ttl_secs),
            ("gateway.attempt_timeout_ms", self.gateway.attempt_timeout_ms),
            ("gateway.max_attempts", self.gateway.max_attempts as u64),
            ("batch.group_size", self.batch.group_size as u64),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(Error::configuration_with_context(
                    "value must be greater than zero",
                    ErrorContext::new()
                        .with_field_path(field)
                        .with_source("config_validator"),
                ));
            }
        }
        if self.cache.namespace.trim().is_empty() || self.cache.namespace.contains(':') {
            return Err(Error::configuration_with_context(
                "namespace must be non-empty and must not contain ':'",
                ErrorContext::new()
                    .with_field_path("cache.namespace")
                    .with_details(self.cache.namespace.clone())
                    .with_source("config_validator"),
            ));
        }
        Ok(())
    }
}
