//! In-place translation of selected string fields inside response payloads.

use crate::batch::{BatchDispatcher, ItemOutcome};
use crate::language::TargetLanguage;
use crate::utils::json_path::{collect_matches, write_back, PathMatch};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathReport {
    pub path: String,
    pub matched: usize,
    pub written: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectionReport {
    pub paths: Vec<PathReport>,
}

impl ProjectionReport {
    pub fn matched(&self) -> usize {
        self.paths.iter().map(|p| p.matched).sum()
    }

    pub fn written(&self) -> usize {
        self.paths.iter().map(|p| p.written).sum()
    }
}

/// Finds translatable strings in a payload by dotted path and replaces them with their
/// translations. One batch per path; paths are handled one after another.
pub struct PathProjector {
    dispatcher: Arc<BatchDispatcher>,
}

impl PathProjector {
    pub fn new(dispatcher: Arc<BatchDispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Translate every field matched by `paths` and hand back the same payload.
    pub async fn apply<'a, P: AsRef<str>>(
        &self,
        payload: &'a mut Value,
        paths: &[P],
        target: Option<&str>,
    ) -> &'a mut Value {
        self.apply_with_report(payload, paths, target).await;
        payload
    }

    /// Like [`apply`](Self::apply), returning per-path match and write counts instead.
    ///
    /// Never fails: an unusable target language or an unmatched path leaves the payload as it
    /// was, an item whose translation failed keeps its original text.
    pub async fn apply_with_report<P: AsRef<str>>(
        &self,
        payload: &mut Value,
        paths: &[P],
        target: Option<&str>,
    ) -> ProjectionReport {
        let mut report = ProjectionReport::default();

        let lang = match TargetLanguage::parse_optional(target) {
            Ok(Some(lang)) => lang,
            Ok(None) => return report,
            Err(e) => {
                warn!(error = %e, "payload translation skipped: target language rejected");
                return report;
            }
        };

        for path in paths {
            let path = path.as_ref();
            let matches = collect_matches(payload, path);
            if matches.is_empty() {
                debug!(path, "no translatable fields at path");
                report.paths.push(PathReport {
                    path: path.to_string(),
                    matched: 0,
                    written: 0,
                });
                continue;
            }

            let written = self.project_path(payload, path, &matches, &lang).await;
            report.paths.push(PathReport {
                path: path.to_string(),
                matched: matches.len(),
                written,
            });
        }

        report
    }

    async fn project_path(
        &self,
        payload: &mut Value,
        path: &str,
        matches: &[PathMatch],
        lang: &TargetLanguage,
    ) -> usize {
        let texts: Vec<&str> = matches.iter().map(|m| m.value.as_str()).collect();
        let batch = self.dispatcher.translate_to(&texts, lang).await;

        let mut written = 0;
        for (m, outcome) in matches.iter().zip(batch.outcomes) {
            let ItemOutcome::Translated { value } = outcome else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            match write_back(payload, m, value) {
                Ok(()) => written += 1,
                Err(e) => warn!(path, field = %m.pointer(), error = %e, "could not write translated value"),
            }
        }
        written
    }
}
