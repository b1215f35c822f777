//! Provider gateway: one translation call with a deadline per attempt and bounded retries.
//!
//! # Translation Gateway
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`TranslationProvider`] | Trait for the external service (one call = one attempt) |
//! | [`HttpTranslator`] | DeepL-compatible HTTP implementation |
//! | [`TranslationGateway`] | Timeout + retry/backoff wrapper around a provider |
//! | [`GatewayConfig`] | Attempt timeout, attempt budget, backoff base |
//!
//! ## Policy
//!
//! - Each attempt is bounded by `attempt_timeout` (10s); overrunning counts as a failed attempt.
//! - At most `max_attempts` (3) attempts; after the n-th failure the gateway waits
//!   `n * base_delay` (1s, 2s, ...) before trying again.
//! - Timeouts, transport errors and provider errors all spend the attempt budget. With
//!   [`GatewayConfig::fail_fast_on_rejection`] a provider rejection that cannot improve on retry
//!   (see [`crate::Error::is_retryable`]) stops immediately instead.
//! - When the budget is spent the caller gets [`crate::Error::TranslationFailed`]. Falling back
//!   to the source text is the batch layer's decision, not this one's.
//!
//! A timed-out attempt's future is dropped. For [`HttpTranslator`] that drops the in-flight
//! request and closes the connection client-side; the provider may still have accepted and
//! billed it.

mod http;
mod provider;

pub use http::HttpTranslator;
pub use provider::TranslationProvider;

use crate::language::TargetLanguage;
use crate::{Error, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub attempt_timeout: Duration,
    pub max_attempts: u32,
    pub base_delay: Duration,
    /// Stop after the first provider rejection that cannot change on retry (bad request,
    /// auth, quota). Off: every provider error spends the full attempt budget.
    pub fail_fast_on_rejection: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_secs(10),
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            fail_fast_on_rejection: false,
        }
    }
}

impl GatewayConfig {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_attempt_timeout(mut self, t: Duration) -> Self {
        self.attempt_timeout = t;
        self
    }
    pub fn with_max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n.max(1);
        self
    }
    pub fn with_base_delay(mut self, d: Duration) -> Self {
        self.base_delay = d;
        self
    }
    pub fn with_fail_fast_on_rejection(mut self, enable: bool) -> Self {
        self.fail_fast_on_rejection = enable;
        self
    }

    /// Wait after the `failed_attempts`-th failure (1-based): linear backoff.
    pub fn backoff(&self, failed_attempts: u32) -> Duration {
        self.base_delay.saturating_mul(failed_attempts)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Retry { delay: Duration },
    Fail,
}

pub struct TranslationGateway {
    provider: Arc<dyn TranslationProvider>,
    config: GatewayConfig,
}

impl TranslationGateway {
    pub fn new(provider: Arc<dyn TranslationProvider>, config: GatewayConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    fn decide(&self, err: &Error, attempt: u32) -> Decision {
        let retry = match err {
            Error::Provider { retryable, .. } => *retryable || !self.config.fail_fast_on_rejection,
            other => other.is_retryable(),
        };
        if retry && attempt < self.config.max_attempts {
            Decision::Retry {
                delay: self.config.backoff(attempt),
            }
        } else {
            Decision::Fail
        }
    }

    /// Translate `text` into an already-validated target language.
    pub async fn call(&self, text: &str, target: &TargetLanguage) -> Result<String> {
        let mut attempt: u32 = 0;

        loop {
            attempt = attempt.saturating_add(1);
            let start = Instant::now();

            let attempt_fut = self.provider.translate(text, target);
            let attempt_res = match tokio::time::timeout(self.config.attempt_timeout, attempt_fut).await {
                Ok(r) => r,
                Err(_) => Err(Error::Timeout {
                    after: self.config.attempt_timeout,
                }),
            };

            match attempt_res {
                Ok(translated) => {
                    info!(
                        provider = self.provider.name(),
                        target = target.as_str(),
                        attempt,
                        chars = text.chars().count(),
                        duration_ms = start.elapsed().as_millis() as u64,
                        "translation provider call succeeded"
                    );
                    return Ok(translated);
                }
                Err(e) => match self.decide(&e, attempt) {
                    Decision::Retry { delay } => {
                        warn!(
                            provider = self.provider.name(),
                            target = target.as_str(),
                            attempt,
                            max_attempts = self.config.max_attempts,
                            delay_ms = delay.as_millis() as u64,
                            error = %e,
                            "translation attempt failed; retrying"
                        );
                        if !delay.is_zero() {
                            tokio::time::sleep(delay).await;
                        }
                    }
                    Decision::Fail => {
                        warn!(
                            provider = self.provider.name(),
                            target = target.as_str(),
                            attempt,
                            error = %e,
                            "translation failed"
                        );
                        return Err(match e {
                            e @ Error::UnsupportedLanguage { .. } => e,
                            e => Error::TranslationFailed {
                                attempts: attempt,
                                source: Box::new(e),
                            },
                        });
                    }
                },
            }
        }
    }
}
