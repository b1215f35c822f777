use crate::cache::{CacheKeyGenerator, DistributedCache, MemoryCache, RedisCache};
use crate::client::core::TranslationClient;
use crate::config::TranslationConfig;
use crate::coordinator::CacheCoordinator;
use crate::gateway::{HttpTranslator, TranslationGateway, TranslationProvider};
use crate::Result;
use std::sync::Arc;
use tracing::info;

/// Builder for [`TranslationClient`].
///
/// Without overrides, `build` talks to the HTTP provider configured in
/// [`TranslationConfig::provider`] and to Redis when `cache.redis_url` is set.
pub struct TranslationClientBuilder {
    config: Option<TranslationConfig>,
    provider: Option<Arc<dyn TranslationProvider>>,
    distributed: Option<Arc<dyn DistributedCache>>,
}

impl TranslationClientBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            provider: None,
            distributed: None,
        }
    }

    /// Use this configuration instead of [`TranslationConfig::from_env`].
    pub fn config(mut self, config: TranslationConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace the HTTP provider, e.g. with an in-process engine or a test double.
    pub fn provider(mut self, provider: Arc<dyn TranslationProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Replace the shared tier. Skips connecting to `cache.redis_url`.
    pub fn distributed_cache(mut self, cache: Arc<dyn DistributedCache>) -> Self {
        self.distributed = Some(cache);
        self
    }

    pub async fn build(self) -> Result<TranslationClient> {
        let config = match self.config {
            Some(c) => c,
            None => TranslationConfig::from_env(),
        };
        config.validate()?;

        let provider: Arc<dyn TranslationProvider> = match self.provider {
            Some(p) => p,
            None => Arc::new(HttpTranslator::new(&config.provider)?),
        };

        let distributed = match self.distributed {
            Some(d) => d,
            None => {
                RedisCache::connect_or_null(
                    config.cache.redis_url.as_deref(),
                    config.cache.redis_op_timeout(),
                )
                .await
            }
        };

        let gateway = TranslationGateway::new(provider, config.gateway.to_gateway_config());
        info!(
            provider = gateway.provider_name(),
            distributed = distributed.name(),
            namespace = %config.cache.namespace,
            memory_capacity = config.cache.memory_capacity,
            "translation client ready"
        );

        let coordinator = Arc::new(CacheCoordinator::new(
            CacheKeyGenerator::new().with_namespace(config.cache.namespace.clone()),
            MemoryCache::new(config.cache.memory_capacity, config.cache.ttl()),
            distributed,
            gateway,
            config.cache.ttl(),
        ));

        Ok(TranslationClient::from_coordinator(
            coordinator,
            config.batch.to_batch_config(),
        ))
    }
}

impl Default for TranslationClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
