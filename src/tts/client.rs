use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use super::interface::TTSInterface;
use crate::config_manager::tts::HttpTTSConfig;
use crate::error::ServiceError;

const SERVICE: &str = "synthesis";

/// TTS client for a speech service that answers `POST /tts/synthesize`
/// with raw audio bytes
pub struct HttpTTSClient {
    client: Client,
    base_url: String,
    default_voice: Option<String>,
}

#[derive(Debug, Serialize)]
struct SynthesizeRequest<'a> {
    text: &'a str,
    language: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    voice: Option<&'a str>,
}

impl HttpTTSClient {
    pub fn new(config: &HttpTTSConfig, client: Client) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            default_voice: config.voice.clone(),
        }
    }
}

#[async_trait]
impl TTSInterface for HttpTTSClient {
    async fn generate_audio(&self, text: &str, language: &str) -> Result<Vec<u8>, ServiceError> {
        let request = SynthesizeRequest {
            text,
            language,
            voice: self.default_voice.as_deref(),
        };

        debug!("Sending TTS request: language={}, {} chars", language, text.chars().count());
        let url = format!("{}/tts/synthesize", self.base_url);
        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }

        let audio = response.bytes().await?.to_vec();
        if audio.is_empty() {
            return Err(ServiceError::InvalidResponse {
                service: SERVICE,
                message: "empty audio".to_string(),
            });
        }
        Ok(audio)
    }
}
