use std::path::Path;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::interface::{ASRInterface, TranscriptSegment, Transcription};
use crate::config_manager::asr::ASRConfig;
use crate::error::ServiceError;
use crate::languages::normalize_language_code;

const SERVICE: &str = "transcription";

/// Client for an OpenAI-compatible Whisper server (`/v1/audio/transcriptions`)
pub struct WhisperClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WhisperResponse {
    text: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    segments: Vec<WhisperSegment>,
}

#[derive(Debug, Deserialize)]
struct WhisperSegment {
    #[serde(default)]
    start: f64,
    #[serde(default)]
    end: f64,
    #[serde(default)]
    text: String,
}

impl WhisperClient {
    pub fn new(config: &ASRConfig) -> Result<Self, ServiceError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
        })
    }
}

fn mime_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("ogg") => "audio/ogg",
        _ => "audio/webm",
    }
}

#[async_trait]
impl ASRInterface for WhisperClient {
    async fn transcribe_file(&self, audio_path: &Path) -> Result<Transcription, ServiceError> {
        let bytes = tokio::fs::read(audio_path).await?;
        let file_name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.webm")
            .to_string();

        debug!("Sending {} ({} bytes) to {}", file_name, bytes.len(), self.base_url);

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime_for(audio_path))?;
        let form = Form::new()
            .part("file", part)
            .text("model", self.model.clone())
            .text("response_format", "verbose_json");

        let url = format!("{}/v1/audio/transcriptions", self.base_url);
        let mut request = self.client.post(&url).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }

        let result: WhisperResponse = response.json().await?;
        let language = normalize_language_code(result.language.as_deref().unwrap_or("en"));

        Ok(Transcription {
            text: result.text,
            language,
            segments: result
                .segments
                .into_iter()
                .map(|s| TranscriptSegment {
                    start: s.start,
                    end: s.end,
                    text: s.text,
                })
                .collect(),
        })
    }
}
