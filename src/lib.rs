//! # transcache
//!
//! 带两级缓存与批量调度的翻译服务库。
//!
//! Translation service with a two-tier cache and batched, rate-friendly dispatch to an
//! external machine-translation provider.
//!
//! ## Overview
//!
//! Every request for a `(text, target language)` pair goes through the same path:
//! in-process LRU, then the shared store (Redis), then the provider. A provider result is
//! written back to both tiers so the next process that asks, on this host or another one,
//! gets it without a paid call. Provider calls are bounded per attempt and retried with a
//! linearly growing pause; batches are deduplicated and sent in small concurrent groups.
//!
//! On top of that sits a projector that walks JSON payloads by dotted path
//! (`"data.reviews.content"`) and swaps the matched strings for their translations in place.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use serde_json::json;
//! use transcache::TranslationClient;
//!
//! #[tokio::main]
//! async fn main() -> transcache::Result<()> {
//!     // reads TRANSCACHE_* / DEEPL_API_KEY / REDIS_URL from the environment
//!     let client = TranslationClient::builder().build().await?;
//!
//!     let hello = client.translate_text("안녕하세요", Some("en")).await?;
//!     println!("{}", hello);
//!
//!     let mut payload = json!({"data": {"reviews": [{"content": "좋아요"}]}});
//!     client
//!         .apply_translations(&mut payload, &["data.reviews.content"], Some("en"))
//!         .await;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | [`TranslationClient`] and its builder |
//! | [`coordinator`] | Cache-then-compute flow across both tiers |
//! | [`cache`] | Key derivation, in-process LRU, Redis tier |
//! | [`gateway`] | Provider trait, HTTP provider, timeout and retry |
//! | [`batch`] | Dedup, grouping, concurrent dispatch |
//! | [`projector`] | In-place translation of JSON payload fields |
//! | [`language`] | Target-language normalization |
//! | [`config`] | YAML/env configuration |
//! | [`utils`] | Dotted-path matching over JSON |

pub mod batch;
pub mod cache;
pub mod client;
pub mod config;
pub mod coordinator;
pub mod gateway;
pub mod language;
pub mod projector;
pub mod utils;

#[cfg(test)]
mod testing;

// Re-export main types for convenience
pub use batch::{BatchConfig, BatchReport, ItemOutcome};
pub use client::{TranslationClient, TranslationClientBuilder};
pub use config::TranslationConfig;
pub use coordinator::{CacheCoordinator, ClearSummary, CoordinatorStats};
pub use gateway::{GatewayConfig, TranslationProvider};
pub use language::TargetLanguage;
pub use projector::ProjectionReport;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
