//! Target language normalization.
//!
//! Callers pass short, loosely-formatted tags (`"ko"`, `"en"`, `"en_gb"`, `"Korean"`).
//! The provider only accepts a fixed set of upper-case codes and insists on a regional
//! variant for a few languages, so every tag is mapped onto that allow-list exactly once,
//! before any cache lookup or network call.

use crate::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Target codes the provider accepts.
pub const SUPPORTED_TARGETS: &[&str] = &[
    "AR", "BG", "CS", "DA", "DE", "EL", "EN-GB", "EN-US", "ES", "ET", "FI", "FR", "HU", "ID",
    "IT", "JA", "KO", "LT", "LV", "NB", "NL", "PL", "PT-BR", "PT-PT", "RO", "RU", "SK", "SL",
    "SV", "TR", "UK", "ZH", "ZH-HANT",
];

/// Bare codes and language names that resolve to a specific target code.
const ALIASES: &[(&str, &str)] = &[
    ("EN", "EN-US"),
    ("PT", "PT-BR"),
    ("ZH-CN", "ZH"),
    ("ZH-HANS", "ZH"),
    ("ZH-TW", "ZH-HANT"),
    ("ZH-HK", "ZH-HANT"),
    ("NO", "NB"),
    ("ENGLISH", "EN-US"),
    ("KOREAN", "KO"),
    ("JAPANESE", "JA"),
    ("CHINESE", "ZH"),
    ("GERMAN", "DE"),
    ("FRENCH", "FR"),
    ("SPANISH", "ES"),
    ("PORTUGUESE", "PT-BR"),
    ("RUSSIAN", "RU"),
    ("ITALIAN", "IT"),
];

/// A validated provider target code, e.g. `KO` or `EN-GB`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TargetLanguage(String);

impl TargetLanguage {
    /// Normalize a caller-supplied tag. Case-insensitive; `_` is accepted in place of `-`.
    pub fn parse(code: &str) -> Result<Self> {
        let canonical = code.trim().replace('_', "-").to_uppercase();
        if canonical.is_empty() {
            return Err(Error::UnsupportedLanguage {
                code: code.to_string(),
            });
        }

        if let Some((_, target)) = ALIASES.iter().find(|(alias, _)| *alias == canonical) {
            return Ok(Self((*target).to_string()));
        }

        if SUPPORTED_TARGETS.contains(&canonical.as_str()) {
            return Ok(Self(canonical));
        }

        Err(Error::UnsupportedLanguage {
            code: code.to_string(),
        })
    }

    /// Treat an absent or blank tag as "no translation requested".
    pub fn parse_optional(code: Option<&str>) -> Result<Option<Self>> {
        match code.map(str::trim) {
            None | Some("") => Ok(None),
            Some(c) => Self::parse(c).map(Some),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TargetLanguage {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
