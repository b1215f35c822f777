use std::time::Duration;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "cache.memory_capacity", "data.reviews.content")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected value, offending input)
    pub details: Option<String>,
    /// Source of the error (e.g., "config_validator", "language_normalizer")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for the translation layer.
///
/// Cache-tier failures never reach callers through this type; they are logged and treated
/// as misses inside the cache backends.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unsupported target language: '{code}'")]
    UnsupportedLanguage { code: String },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Provider error{}: {message}", format_status(.status))]
    Provider {
        message: String,
        status: Option<u16>,
        retryable: bool,
    },

    #[error("Translation attempt timed out after {}ms", .after.as_millis())]
    Timeout { after: Duration },

    #[error("Translation failed after {attempts} attempt(s): {source}")]
    TranslationFailed {
        attempts: u32,
        #[source]
        source: Box<Error>,
    },

    #[error("Network transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

fn format_status(status: &Option<u16>) -> String {
    match status {
        Some(s) => format!(" (HTTP {})", s),
        None => String::new(),
    }
}

impl Error {
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// A provider failure worth another attempt (rate limit, 5xx, dropped connection).
    pub fn provider(msg: impl Into<String>) -> Self {
        Error::Provider {
            message: msg.into(),
            status: None,
            retryable: true,
        }
    }

    /// A provider rejection that will fail the same way on every attempt.
    pub fn provider_rejected(msg: impl Into<String>, status: Option<u16>) -> Self {
        Error::Provider {
            message: msg.into(),
            status,
            retryable: false,
        }
    }

    /// Whether the gateway may spend another attempt after this error.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Provider { retryable, .. } => *retryable,
            Error::Timeout { .. } | Error::Transport(_) => true,
            Error::UnsupportedLanguage { .. }
            | Error::Configuration { .. }
            | Error::TranslationFailed { .. } => false,
            Error::Yaml(_) | Error::Io(_) => false,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }
}
