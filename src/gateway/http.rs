use super::provider::TranslationProvider;
use crate::config::ProviderSettings;
use crate::language::TargetLanguage;
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    text: [&'a str; 1],
    target_lang: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    text: String,
}

/// DeepL-compatible HTTP provider (`POST {base_url}/v2/translate`).
pub struct HttpTranslator {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpTranslator {
    pub fn new(settings: &ProviderSettings) -> Result<Self> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                Error::configuration_with_context(
                    "translation provider API key is not set",
                    ErrorContext::new()
                        .with_field_path("provider.api_key")
                        .with_details("set TRANSCACHE_API_KEY or DEEPL_API_KEY")
                        .with_source("http_translator"),
                )
            })?;

        // The gateway enforces the per-attempt deadline; this is only a backstop for
        // connections that stall outside of it.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(settings.request_timeout_ms.max(1)))
            .pool_max_idle_per_host(settings.pool_max_idle_per_host)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl TranslationProvider for HttpTranslator {
    async fn translate(&self, text: &str, target: &TargetLanguage) -> Result<String> {
        let url = format!("{}/v2/translate", self.base_url);
        let body = TranslateRequest {
            text: [text],
            target_lang: target.as_str(),
        };

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let code = status.as_u16();
            let message = resp.text().await.unwrap_or_default();
            let message = if message.is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                message
            };
            // 429 and 5xx clear up on their own; other 4xx (bad request, auth, quota)
            // fail identically on every attempt.
            if code == 429 || code == 408 || status.is_server_error() {
                return Err(Error::Provider {
                    message,
                    status: Some(code),
                    retryable: true,
                });
            }
            return Err(Error::provider_rejected(message, Some(code)));
        }

        let parsed: TranslateResponse = resp.json().await?;
        parsed
            .translations
            .into_iter()
            .next()
            .map(|t| t.text)
            .ok_or_else(|| Error::provider("provider response contained no translations"))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
