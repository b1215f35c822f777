//! Cache key generation.

use crate::language::TargetLanguage;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub const DEFAULT_NAMESPACE: &str = "translation";

/// Key under which one (source text, target language) translation is stored in both tiers.
///
/// Rendered as `<namespace>:<language>:<sha256(text)>`. The language is its own segment,
/// so the same text translated into two languages lands on two distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    key: String,
    pub language: String,
}

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key)
    }
}

#[derive(Debug, Clone)]
pub struct CacheKeyGenerator {
    namespace: String,
}

impl CacheKeyGenerator {
    pub fn new() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Prefix shared by every key this generator produces; used for bulk invalidation.
    pub fn prefix(&self) -> String {
        format!("{}:", self.namespace)
    }

    pub fn generate(&self, text: &str, language: &TargetLanguage) -> CacheKey {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        let digest: String = hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect();
        CacheKey {
            key: format!("{}:{}:{}", self.namespace, language.as_str(), digest),
            language: language.as_str().to_string(),
        }
    }
}

impl Default for CacheKeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}
