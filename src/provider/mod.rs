// Pluggable translation backends
//
// Each backend lives in its own module behind the TranslationProvider trait:
// - Dummy: appends a language marker, for tests and offline runs
// - LibreTranslate: self-hostable REST API
// - MyMemory: free translation memory API

pub mod common;
pub mod dummy;
pub mod libretranslate;
pub mod mymemory;

use async_trait::async_trait;

pub use common::MaskedText;
use crate::config::ServicesConfig;
use crate::error::{Result, LocsyncError};

/// Capability surface of a translation backend
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Translate text into the target language, preserving `:placeholder`
    /// tokens verbatim and in order. One attempt per call, no retries.
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
        source_language: Option<&str>,
    ) -> Result<String>;

    /// Whether required settings (URL, credential) are present. A provider
    /// constructs fine without them so the registry can report its state.
    fn is_configured(&self) -> bool;

    /// Language codes the backend accepts
    fn supported_languages(&self) -> &'static [&'static str];

    /// Stable name used in configuration and outcome reporting
    fn name(&self) -> &'static str;
}

/// Registry mapping provider names to instances
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider by name; unknown names are a configuration error
    pub fn create(
        name: &str,
        services: &ServicesConfig,
    ) -> Result<Box<dyn TranslationProvider>> {
        match name {
            "dummy" => Ok(Box::new(dummy::DummyProvider::new())),
            "libretranslate" => Ok(Box::new(libretranslate::LibreTranslateProvider::new(
                services.libretranslate.clone(),
            )?)),
            "mymemory" => Ok(Box::new(mymemory::MyMemoryProvider::new(
                services.mymemory.clone(),
            )?)),
            _ => Err(LocsyncError::Config(format!(
                "Unsupported translation provider: {}",
                name
            ))),
        }
    }

    /// Known provider names with human-readable labels, for diagnostics
    pub fn available() -> &'static [(&'static str, &'static str)] {
        &[
            ("dummy", "Dummy provider (for testing)"),
            ("libretranslate", "LibreTranslate"),
            ("mymemory", "MyMemory"),
        ]
    }
}
