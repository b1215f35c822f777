use crate::batch::{BatchDispatcher, BatchReport};
use crate::coordinator::{CacheCoordinator, ClearSummary, CoordinatorStats};
use crate::projector::{PathProjector, ProjectionReport};
use crate::Result;
use serde_json::Value;
use std::sync::Arc;

/// Entry point for callers: single strings, batches, payload projection and cache admin,
/// all backed by one shared [`CacheCoordinator`].
///
/// Cheap to clone; clones share caches, counters and the provider connection pool.
#[derive(Clone)]
pub struct TranslationClient {
    pub(crate) coordinator: Arc<CacheCoordinator>,
    pub(crate) dispatcher: Arc<BatchDispatcher>,
    pub(crate) projector: Arc<PathProjector>,
}

impl TranslationClient {
    pub(crate) fn from_coordinator(coordinator: Arc<CacheCoordinator>, batch: crate::batch::BatchConfig) -> Self {
        let dispatcher = Arc::new(BatchDispatcher::new(coordinator.clone(), batch));
        let projector = Arc::new(PathProjector::new(dispatcher.clone()));
        Self {
            coordinator,
            dispatcher,
            projector,
        }
    }

    /// Translate one string. `None` (or a blank code) returns `text` unchanged.
    pub async fn translate_text(&self, text: &str, target: Option<&str>) -> Result<String> {
        self.coordinator.translate(text, target).await
    }

    /// Translate many strings; output lines up with input, failures keep their original text.
    pub async fn translate_many<S: AsRef<str>>(&self, texts: &[S], target: Option<&str>) -> Vec<String> {
        self.dispatcher.translate_many(texts, target).await
    }

    /// Like [`translate_many`](Self::translate_many) with per-item outcomes.
    pub async fn translate_detailed<S: AsRef<str>>(&self, texts: &[S], target: Option<&str>) -> BatchReport {
        self.dispatcher.translate_detailed(texts, target).await
    }

    /// Translate the fields named by `paths` in place and return the same payload.
    pub async fn apply_translations<'a, P: AsRef<str>>(
        &self,
        payload: &'a mut Value,
        paths: &[P],
        target: Option<&str>,
    ) -> &'a mut Value {
        self.projector.apply(payload, paths, target).await
    }

    pub async fn apply_translations_with_report<P: AsRef<str>>(
        &self,
        payload: &mut Value,
        paths: &[P],
        target: Option<&str>,
    ) -> ProjectionReport {
        self.projector.apply_with_report(payload, paths, target).await
    }

    pub async fn cache_stats(&self) -> CoordinatorStats {
        self.coordinator.stats().await
    }

    pub async fn clear_cache(&self) -> ClearSummary {
        self.coordinator.clear().await
    }

    pub fn coordinator(&self) -> &Arc<CacheCoordinator> {
        &self.coordinator
    }
}
