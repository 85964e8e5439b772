use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LibreTranslateSettings;
use crate::error::{Result, LocsyncError};
use super::TranslationProvider;
use super::common::{http_client, normalize_language_code, MaskedText};

const SUPPORTED_LANGUAGES: &[&str] = &[
    "en", "es", "fr", "de", "it", "pt", "ru", "ja", "ko", "zh", "ar", "hi", "bn", "id", "tr",
    "ur", "bg", "cs", "da", "nl", "fi", "el", "hu", "lt", "lv", "nb", "pl", "ro", "sk", "sl",
    "sv", "uk", "he", "fa", "ms", "th", "vi", "et", "sq", "az", "ca", "eo", "ga", "gl", "ky",
    "tl",
];

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

/// LibreTranslate REST backend (self-hostable, optional API key)
pub struct LibreTranslateProvider {
    client: Client,
    settings: LibreTranslateSettings,
}

impl LibreTranslateProvider {
    pub fn new(settings: LibreTranslateSettings) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            settings,
        })
    }
}

#[async_trait]
impl TranslationProvider for LibreTranslateProvider {
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
        source_language: Option<&str>,
    ) -> Result<String> {
        let source = normalize_language_code(source_language.unwrap_or("en"));
        let target = normalize_language_code(target_language);
        let masked = MaskedText::mask(text);

        let url = format!("{}/translate", self.settings.url.trim_end_matches('/'));
        let request = TranslateRequest {
            q: &masked.text,
            source: &source,
            target: &target,
            format: "text",
            api_key: self.settings.api_key.as_deref(),
        };

        debug!("Sending translation request to: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| LocsyncError::Provider(format!("LibreTranslate request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LocsyncError::Provider(format!(
                "LibreTranslate API error {}: {}",
                status, body
            )));
        }

        let payload: TranslateResponse = response.json().await.map_err(|e| {
            LocsyncError::Provider(format!("Invalid response from LibreTranslate: {}", e))
        })?;

        Ok(masked.restore(payload.translated_text.trim()))
    }

    fn is_configured(&self) -> bool {
        !self.settings.url.trim().is_empty()
    }

    fn supported_languages(&self) -> &'static [&'static str] {
        SUPPORTED_LANGUAGES
    }

    fn name(&self) -> &'static str {
        "libretranslate"
    }
}
