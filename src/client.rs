//! Public client surface.
//!
//! [`TranslationClientBuilder`] wires configuration, provider and cache tiers together;
//! [`TranslationClient`] is what the rest of an application holds on to.

pub mod builder;
pub mod core;

pub use builder::TranslationClientBuilder;
pub use self::core::TranslationClient;

impl TranslationClient {
    pub fn builder() -> TranslationClientBuilder {
        TranslationClientBuilder::new()
    }
}
