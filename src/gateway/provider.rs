use crate::language::TargetLanguage;
use crate::Result;
use async_trait::async_trait;

/// The external translation service, seen as one opaque, fallible, slow call.
///
/// One invocation is one billed request. Retries, timeouts and caching are layered on top
/// by [`super::TranslationGateway`] and the coordinator; implementations should perform a
/// single attempt and report failures through [`crate::Error::Provider`] (setting
/// `retryable` accordingly) or [`crate::Error::Transport`].
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    async fn translate(&self, text: &str, target: &TargetLanguage) -> Result<String>;

    fn name(&self) -> &'static str;
}
