// Translation service client
//
// Thin wrapper around the external translation service. Failures are logged
// and returned as errors; the untranslated text is never substituted for a
// failed translation, since forwarding it to the generative service would be
// a silent correctness bug. At most one attempt per call, no retries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

use crate::core::config::Config;
use crate::core::errors::{TranslationError, TranslationResult};

/// Capability to translate free text between the configured language pair
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> TranslationResult<String>;
}

/// HTTP client for the translation service
pub struct TranslationClient {
    endpoint: String,
    source_lang: String,
    target_lang: String,
    http_client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    text: &'a str,
    source_language_code: &'a str,
    target_language_code: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translated_text: String,
}

impl TranslationClient {
    pub fn new(config: &Config) -> TranslationResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            endpoint: config.translation.endpoint.clone(),
            source_lang: config.translation.source_lang.clone(),
            target_lang: config.translation.target_lang.clone(),
            http_client,
        })
    }
}

#[async_trait]
impl Translator for TranslationClient {
    async fn translate(&self, text: &str) -> TranslationResult<String> {
        debug!(
            "Translating {} -> {}: {}",
            self.source_lang,
            self.target_lang,
            text.chars().take(50).collect::<String>()
        );

        let request = TranslateRequest {
            text,
            source_language_code: &self.source_lang,
            target_language_code: &self.target_lang,
        };

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Translation request failed: {}", e);
                TranslationError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Translation service returned {}: {}", status, body);
            return Err(TranslationError::ServiceError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TranslateResponse = response.json().await.map_err(|e| {
            error!("Failed to parse translation response: {}", e);
            TranslationError::InvalidResponse(e.to_string())
        })?;

        if parsed.translated_text.is_empty() {
            error!("Translation service returned an empty translation");
            return Err(TranslationError::InvalidResponse(
                "empty translated_text".to_string(),
            ));
        }

        Ok(parsed.translated_text)
    }
}
