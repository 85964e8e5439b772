use std::sync::OnceLock;
use std::time::Duration;
use regex::Regex;
use reqwest::Client;

use crate::error::{Result, LocsyncError};

/// Marker substituted for placeholder tokens while text is at the backend.
/// Bracketed uppercase survives machine translation untouched in practice.
const PLACEHOLDER_MARKER: &str = "[PLACEHOLDER]";

/// Uniform timeout applied to every remote provider call. Providers never
/// retry; a timeout surfaces as a single provider failure.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r":[A-Za-z_]\w*").expect("placeholder pattern is valid"))
}

/// Build the HTTP client shared by remote providers
pub fn http_client() -> Result<Client> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("locsync/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| LocsyncError::Provider(format!("Failed to build HTTP client: {}", e)))
}

/// Text with its placeholder tokens masked out, ready to send to a backend
#[derive(Debug, Clone)]
pub struct MaskedText {
    pub text: String,
    placeholders: Vec<String>,
}

impl MaskedText {
    /// Record every `:identifier` token left to right and replace each
    /// occurrence with a neutral marker the backend will not translate.
    pub fn mask(source: &str) -> Self {
        let pattern = placeholder_pattern();
        let placeholders = pattern
            .find_iter(source)
            .map(|m| m.as_str().to_string())
            .collect();
        let text = pattern.replace_all(source, PLACEHOLDER_MARKER).into_owned();

        Self { text, placeholders }
    }

    /// Replace markers in the translated text positionally with the recorded
    /// tokens. If the backend dropped markers, the tail tokens are lost; if
    /// it returned extra markers, the surplus is left in place.
    pub fn restore(&self, translated: &str) -> String {
        let mut result = String::with_capacity(translated.len());
        let mut rest = translated;
        let mut index = 0;

        while let Some(pos) = rest.find(PLACEHOLDER_MARKER) {
            result.push_str(&rest[..pos]);
            match self.placeholders.get(index) {
                Some(token) => result.push_str(token),
                None => result.push_str(PLACEHOLDER_MARKER),
            }
            index += 1;
            rest = &rest[pos + PLACEHOLDER_MARKER.len()..];
        }
        result.push_str(rest);

        result
    }

    pub fn placeholder_count(&self) -> usize {
        self.placeholders.len()
    }
}

/// Common two-letter codes pass through unchanged; provider-specific
/// reshapes (region tags and the like) live in the individual adapters.
pub fn normalize_language_code(language: &str) -> String {
    language.trim().to_lowercase()
}
