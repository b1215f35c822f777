//! 批量翻译模块：去重、分组并发、组间限速。
//!
//! # Batched Translation Module
//!
//! Translating a response usually means translating dozens of short strings, many of them
//! repeated (status labels, service names). Sending them one by one wastes provider quota,
//! sending them all at once trips the provider's rate limit.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`BatchDispatcher`] | Runs one batch end to end through the cache coordinator |
//! | [`BatchConfig`] | Group size and inter-group pause |
//! | [`BatchPlan`] | Distinct inputs plus the index map back to the original order |
//! | [`ItemOutcome`] | Per-item result: translated, skipped, or fallback to original |
//! | [`BatchReport`] | All outcomes of one call, in input order |
//!
//! ## Execution
//!
//! 1. Deduplicate; every repeat of a string shares one translation.
//! 2. Split the distinct strings into groups of `group_size` (10).
//! 3. Translate a group's members concurrently, wait for all of them.
//! 4. Pause `group_delay` (500ms) before the next group.
//! 5. Fan results back out to the original positions.
//!
//! A failing item falls back to its original text; it never fails the batch.

mod dispatcher;
mod plan;

pub use dispatcher::{BatchDispatcher, BatchReport, ItemOutcome};
pub use plan::{BatchConfig, BatchPlan};
