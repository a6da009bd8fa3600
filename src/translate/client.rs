use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::interface::{InstalledLanguage, TranslateInterface};
use crate::config_manager::translate::TranslateConfig;
use crate::error::ServiceError;

const SERVICE: &str = "translation";

/// Client for a LibreTranslate server, which runs Argos Translate models
pub struct LibreTranslateClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl LibreTranslateClient {
    pub fn new(config: &TranslateConfig) -> Result<Self, ServiceError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
        })
    }
}

#[async_trait]
impl TranslateInterface for LibreTranslateClient {
    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String, ServiceError> {
        let url = format!("{}/translate", self.base_url);
        let body = TranslateRequest {
            q: text,
            source: source_lang,
            target: target_lang,
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        debug!("Translating {} chars {} -> {}", text.chars().count(), source_lang, target_lang);
        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }

        let result: TranslateResponse = response.json().await?;
        match result.translated_text {
            Some(text) => Ok(text),
            None => Err(ServiceError::InvalidResponse {
                service: SERVICE,
                message: result
                    .error
                    .unwrap_or_else(|| "missing translatedText".to_string()),
            }),
        }
    }

    async fn installed_languages(&self) -> Result<Vec<InstalledLanguage>, ServiceError> {
        let url = format!("{}/languages", self.base_url);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}
