use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::MyMemorySettings;
use crate::error::{Result, LocsyncError};
use super::TranslationProvider;
use super::common::{http_client, normalize_language_code, MaskedText};

const SUPPORTED_LANGUAGES: &[&str] = &[
    "en", "es", "fr", "de", "it", "pt", "ru", "ja", "ko", "zh", "ar", "hi", "bn", "id", "tr",
    "ur", "bg", "cs", "da", "nl", "fi", "el", "hu", "lt", "lv", "no", "pl", "ro", "sk", "sl",
    "sv", "uk", "hr", "sr", "mk", "et", "sq", "bs", "is", "ga", "cy", "he", "fa", "sw", "af",
];

#[derive(Debug, Deserialize)]
struct MyMemoryResponse {
    #[serde(rename = "responseData")]
    response_data: MyMemoryData,
    #[serde(rename = "responseStatus")]
    response_status: serde_json::Value,
    #[serde(rename = "responseDetails", default)]
    response_details: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MyMemoryData {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

/// MyMemory translation memory backend (free, keyless; the API wants
/// region-tagged codes for a few languages)
pub struct MyMemoryProvider {
    client: Client,
    settings: MyMemorySettings,
}

impl MyMemoryProvider {
    pub fn new(settings: MyMemorySettings) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            settings,
        })
    }

    fn backend_language_code(language: &str) -> String {
        let code = normalize_language_code(language);
        match code.as_str() {
            "zh" => "zh-CN".to_string(),
            "pt" => "pt-PT".to_string(),
            "no" => "nb-NO".to_string(),
            _ => code,
        }
    }
}

#[async_trait]
impl TranslationProvider for MyMemoryProvider {
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
        source_language: Option<&str>,
    ) -> Result<String> {
        let source = Self::backend_language_code(source_language.unwrap_or("en"));
        let target = Self::backend_language_code(target_language);
        let masked = MaskedText::mask(text);
        let langpair = format!("{}|{}", source, target);

        let url = format!("{}/get", self.settings.url.trim_end_matches('/'));
        let mut query: Vec<(&str, &str)> = vec![("q", &masked.text), ("langpair", &langpair)];
        if let Some(email) = self.settings.email.as_deref() {
            query.push(("de", email));
        }

        debug!("Sending translation request to: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| LocsyncError::Provider(format!("MyMemory request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(LocsyncError::Provider(format!(
                "MyMemory API error: HTTP {}",
                response.status()
            )));
        }

        let payload: MyMemoryResponse = response.json().await.map_err(|e| {
            LocsyncError::Provider(format!("Invalid response from MyMemory: {}", e))
        })?;

        // The body-level status is sometimes a string, sometimes a number
        let status_ok = match &payload.response_status {
            serde_json::Value::Number(n) => n.as_i64() == Some(200),
            serde_json::Value::String(s) => s == "200",
            _ => false,
        };
        if !status_ok {
            return Err(LocsyncError::Provider(format!(
                "MyMemory API error: {}",
                payload
                    .response_details
                    .unwrap_or_else(|| "Unknown error".to_string())
            )));
        }

        Ok(masked.restore(payload.response_data.translated_text.trim()))
    }

    fn is_configured(&self) -> bool {
        !self.settings.url.trim().is_empty()
    }

    fn supported_languages(&self) -> &'static [&'static str] {
        SUPPORTED_LANGUAGES
    }

    fn name(&self) -> &'static str {
        "mymemory"
    }
}
