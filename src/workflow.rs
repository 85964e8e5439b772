use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::catalog;
use crate::config::{Config, FallbackStrategy};
use crate::error::Result;
use crate::provider::{ProviderFactory, TranslationProvider};
use crate::scanner::TranslationKey;

/// Per-run overrides resolved from CLI options on top of configuration
#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    pub auto_translate: bool,
    pub fallback_strategy: FallbackStrategy,
}

impl SyncOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            auto_translate: config.auto_translate,
            fallback_strategy: config.fallback_strategy,
        }
    }
}

/// Result of one (key, target language) translation attempt. Fallback
/// outcomes are not successes, but their value is persisted all the same:
/// a processed key is never left absent from a target catalog.
#[derive(Debug, Clone)]
pub struct TranslationOutcome {
    pub success: bool,
    pub value: String,
    /// `same_language`, `no_translation`, `fallback`, or the provider name
    pub method: String,
    pub error: Option<String>,
}

/// Outcomes per target language for one key
pub type KeyOutcomes = BTreeMap<String, TranslationOutcome>;

/// Drives one translation run: for each missing key and target language,
/// obtain a value (provider, short-circuit, or fallback) and merge it into
/// the locale's catalog. Single-threaded, run to completion, no retries.
pub struct Workflow {
    config: Config,
    provider: Box<dyn TranslationProvider>,
    catalog_root: PathBuf,
}

impl Workflow {
    /// Build a workflow with the configured provider. An unknown provider
    /// name downgrades to the dummy provider so a run never aborts on
    /// misconfiguration alone.
    pub fn new(config: Config) -> Self {
        let provider = match ProviderFactory::create(&config.service, &config.services) {
            Ok(provider) => provider,
            Err(e) => {
                warn!(
                    "Falling back to dummy translation provider: {}. Available: {}",
                    e,
                    ProviderFactory::available()
                        .iter()
                        .map(|(name, _)| *name)
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                Box::new(crate::provider::dummy::DummyProvider::new())
            }
        };

        Self::with_provider(config, provider)
    }

    pub fn with_provider(config: Config, provider: Box<dyn TranslationProvider>) -> Self {
        let catalog_root = PathBuf::from(&config.output_dir);
        Self {
            config,
            provider,
            catalog_root,
        }
    }

    pub fn provider(&self) -> &dyn TranslationProvider {
        self.provider.as_ref()
    }

    /// Process one key into every target catalog. Provider failures are
    /// absorbed into fallback outcomes; catalog I/O failures propagate.
    pub async fn process_key(
        &self,
        key: &TranslationKey,
        targets: &[String],
        options: SyncOptions,
    ) -> Result<KeyOutcomes> {
        let source_value = key.text.as_str();
        let mut outcomes = KeyOutcomes::new();

        for language in targets {
            let outcome = self
                .translate_for_language(source_value, language, options)
                .await;

            catalog::upsert(
                &self.catalog_root,
                language,
                &key.text,
                &outcome.value,
                self.config.file_format,
            )
            .await?;

            outcomes.insert(language.clone(), outcome);
        }

        Ok(outcomes)
    }

    /// Process the whole missing set. Outcomes are independent: a provider
    /// failure for one (key, language) pair never stops the rest.
    pub async fn process_missing(
        &self,
        missing: &[TranslationKey],
        options: SyncOptions,
    ) -> Result<BTreeMap<String, KeyOutcomes>> {
        let targets = self.config.effective_targets();
        let mut results = BTreeMap::new();

        info!(
            "Processing {} missing key(s) into {} target language(s)",
            missing.len(),
            targets.len()
        );

        for key in missing {
            let outcomes = self.process_key(key, &targets, options).await?;
            results.insert(key.text.clone(), outcomes);
        }

        Ok(results)
    }

    async fn translate_for_language(
        &self,
        source_value: &str,
        target_language: &str,
        options: SyncOptions,
    ) -> TranslationOutcome {
        // Same language never goes to a provider
        if target_language == self.config.source_language {
            return TranslationOutcome {
                success: true,
                value: source_value.to_string(),
                method: "same_language".to_string(),
                error: None,
            };
        }

        if !options.auto_translate || !self.provider.is_configured() {
            return TranslationOutcome {
                success: true,
                value: source_value.to_string(),
                method: "no_translation".to_string(),
                error: None,
            };
        }

        match self
            .provider
            .translate(
                source_value,
                target_language,
                Some(&self.config.source_language),
            )
            .await
        {
            Ok(value) => TranslationOutcome {
                success: true,
                value,
                method: self.provider.name().to_string(),
                error: None,
            },
            Err(e) => {
                warn!(
                    "Translation to '{}' failed, applying fallback: {}",
                    target_language, e
                );
                TranslationOutcome {
                    success: false,
                    value: fallback_value(source_value, options.fallback_strategy),
                    method: "fallback".to_string(),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Create empty catalogs for the given locales; returns (created, skipped)
    pub async fn init_locales(&self, locales: &[String], force: bool) -> Result<(usize, usize)> {
        let mut created = 0;
        let mut skipped = 0;

        for locale in locales {
            if catalog::init_locale(&self.catalog_root, locale, self.config.file_format, force)
                .await?
            {
                created += 1;
            } else {
                skipped += 1;
            }
        }

        Ok((created, skipped))
    }
}

/// Value persisted when translation is unavailable or fails. The key acts
/// as its own source-language value, so Key and Source differ only when a
/// distinct source value is threaded through.
fn fallback_value(source_value: &str, strategy: FallbackStrategy) -> String {
    match strategy {
        FallbackStrategy::Key => source_value.to_string(),
        FallbackStrategy::Source => source_value.to_string(),
        FallbackStrategy::Empty => String::new(),
    }
}
