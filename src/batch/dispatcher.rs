//! Batch dispatcher.

use super::plan::{BatchConfig, BatchPlan};
use crate::coordinator::CacheCoordinator;
use crate::language::TargetLanguage;
use futures::StreamExt;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// What happened to one input string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemOutcome {
    Translated { value: String },
    /// No target language was requested.
    Skipped { value: String },
    /// Translation failed; the original text stands in.
    Fallback { original: String, reason: String },
}

impl ItemOutcome {
    /// The text to show for this item: the translation, or the original.
    pub fn value(&self) -> &str {
        match self {
            ItemOutcome::Translated { value } | ItemOutcome::Skipped { value } => value,
            ItemOutcome::Fallback { original, .. } => original,
        }
    }

    pub fn into_value(self) -> String {
        match self {
            ItemOutcome::Translated { value } | ItemOutcome::Skipped { value } => value,
            ItemOutcome::Fallback { original, .. } => original,
        }
    }

    pub fn translated(&self) -> Option<&str> {
        match self {
            ItemOutcome::Translated { value } => Some(value),
            _ => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ItemOutcome::Fallback { .. })
    }
}

/// Per-input outcomes of one `translate_detailed` call, in input order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<ItemOutcome>,
    pub distinct: usize,
    pub groups: usize,
    #[serde(with = "duration_ms")]
    pub elapsed: Duration,
}

impl BatchReport {
    fn passthrough<S: AsRef<str>>(texts: &[S], reason: Option<&str>) -> Self {
        let outcomes = texts
            .iter()
            .map(|t| match reason {
                None => ItemOutcome::Skipped {
                    value: t.as_ref().to_string(),
                },
                Some(r) => ItemOutcome::Fallback {
                    original: t.as_ref().to_string(),
                    reason: r.to_string(),
                },
            })
            .collect();
        Self {
            outcomes,
            distinct: 0,
            groups: 0,
            elapsed: Duration::ZERO,
        }
    }

    pub fn translated_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.translated().is_some()).count()
    }

    pub fn fallback_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_fallback()).count()
    }

    pub fn into_texts(self) -> Vec<String> {
        self.outcomes.into_iter().map(ItemOutcome::into_value).collect()
    }
}

mod duration_ms {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }
}

/// Translates many strings at once: dedup, fixed-size groups translated concurrently,
/// groups run one after another with a pause in between, per-item fallback on failure.
pub struct BatchDispatcher {
    coordinator: Arc<CacheCoordinator>,
    config: BatchConfig,
}

impl BatchDispatcher {
    pub fn new(coordinator: Arc<CacheCoordinator>, config: BatchConfig) -> Self {
        Self {
            coordinator,
            config,
        }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Same length and order as `texts`; failed items come back unchanged. Never fails.
    pub async fn translate_many<S: AsRef<str>>(&self, texts: &[S], target: Option<&str>) -> Vec<String> {
        self.translate_detailed(texts, target).await.into_texts()
    }

    pub async fn translate_detailed<S: AsRef<str>>(&self, texts: &[S], target: Option<&str>) -> BatchReport {
        let lang = match TargetLanguage::parse_optional(target) {
            Ok(Some(lang)) => lang,
            Ok(None) => return BatchReport::passthrough(texts, None),
            Err(e) => {
                warn!(error = %e, items = texts.len(), "batch target language rejected; returning originals");
                return BatchReport::passthrough(texts, Some(&e.to_string()));
            }
        };
        self.translate_to(texts, &lang).await
    }

    /// Batch translation for a target that was normalized already.
    pub async fn translate_to<S: AsRef<str>>(&self, texts: &[S], lang: &TargetLanguage) -> BatchReport {
        let start = Instant::now();
        let plan = BatchPlan::new(texts);
        let group_size = self.config.group_size.max(1);
        let group_count = plan.group_count(group_size);

        let mut per_distinct: Vec<Option<ItemOutcome>> = vec![None; plan.distinct().len()];

        for (group_idx, (base, group)) in plan.groups(group_size).enumerate() {
            let results: Vec<(usize, ItemOutcome)> = futures::stream::iter(group.iter().enumerate())
                .map(|(offset, text)| async move {
                    let outcome = match self.coordinator.translate_to(text, lang).await {
                        Ok(value) => ItemOutcome::Translated { value },
                        Err(e) => {
                            warn!(target_lang = lang.as_str(), error = %e, "translation failed; keeping original text");
                            ItemOutcome::Fallback {
                                original: text.to_string(),
                                reason: e.to_string(),
                            }
                        }
                    };
                    (base + offset, outcome)
                })
                .buffer_unordered(group.len())
                .collect()
                .await;

            for (idx, outcome) in results {
                per_distinct[idx] = Some(outcome);
            }

            debug!(group = group_idx + 1, groups = group_count, size = group.len(), "translation group done");

            if group_idx + 1 < group_count && !self.config.group_delay.is_zero() {
                tokio::time::sleep(self.config.group_delay).await;
            }
        }

        let per_distinct: Vec<ItemOutcome> = per_distinct
            .into_iter()
            .zip(plan.distinct())
            .map(|(o, text)| {
                o.unwrap_or_else(|| ItemOutcome::Fallback {
                    original: text.to_string(),
                    reason: "batch result missing".to_string(),
                })
            })
            .collect();

        BatchReport {
            outcomes: plan.fan_out(&per_distinct),
            distinct: per_distinct.len(),
            groups: group_count,
            elapsed: start.elapsed(),
        }
    }
}
