use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::interface::TTSInterface;
use crate::config_manager::tts::GTTSConfig;
use crate::error::ServiceError;
use crate::utils::sentence_divider::chunk_for_speech;

const SERVICE: &str = "synthesis";

/// The translate_tts endpoint rejects longer inputs
const MAX_CHARS_PER_REQUEST: usize = 100;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Google Translate text-to-speech, the same endpoint gTTS talks to.
/// Long text is split into chunks and the MP3 frames concatenated.
pub struct GoogleTTS {
    client: Client,
    base_url: String,
    slow: bool,
}

impl GoogleTTS {
    pub fn new(config: &GTTSConfig, client: Client) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            slow: config.slow,
        }
    }

    fn query(&self, chunk: &str, language: &str, idx: usize, total: usize) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("ie", "UTF-8".to_string()),
            ("client", "tw-ob".to_string()),
            ("tl", language.to_string()),
            ("q", chunk.to_string()),
            ("total", total.to_string()),
            ("idx", idx.to_string()),
            ("textlen", chunk.chars().count().to_string()),
        ];
        if self.slow {
            params.push(("ttsspeed", "0.24".to_string()));
        }
        params
    }
}

#[async_trait]
impl TTSInterface for GoogleTTS {
    async fn generate_audio(&self, text: &str, language: &str) -> Result<Vec<u8>, ServiceError> {
        let chunks = chunk_for_speech(text, MAX_CHARS_PER_REQUEST);
        if chunks.is_empty() {
            return Err(ServiceError::InvalidResponse {
                service: SERVICE,
                message: "no text to speak".to_string(),
            });
        }

        let url = format!("{}/translate_tts", self.base_url);
        let total = chunks.len();
        let mut audio = Vec::new();

        for (idx, chunk) in chunks.iter().enumerate() {
            debug!("gTTS chunk {}/{} ({} chars)", idx + 1, total, chunk.chars().count());
            let response = self
                .client
                .get(&url)
                .header(reqwest::header::USER_AGENT, USER_AGENT)
                .query(&self.query(chunk, language, idx, total))
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ServiceError::Status {
                    service: SERVICE,
                    status: status.as_u16(),
                    body,
                });
            }
            audio.extend_from_slice(&response.bytes().await?);
        }

        if audio.is_empty() {
            return Err(ServiceError::InvalidResponse {
                service: SERVICE,
                message: "empty audio".to_string(),
            });
        }
        Ok(audio)
    }
}
