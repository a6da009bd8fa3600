use std::sync::Arc;
use anyhow::Result;
use reqwest::Client;
use tracing::info;

use super::client::HttpTTSClient;
use super::gtts::GoogleTTS;
use super::interface::TTSInterface;
use crate::config_manager::tts::TTSConfig;

/// Factory for creating TTS engines/clients
pub struct TTSFactory;

impl TTSFactory {
    /// Create a TTS engine based on configuration
    ///
    /// # Arguments
    /// * `tts_config` - TTS section of the service configuration
    ///
    /// # Returns
    /// Shared TTSInterface implementation
    pub fn create_tts(tts_config: &TTSConfig) -> Result<Arc<dyn TTSInterface>> {
        info!("Initializing TTS engine: {}", tts_config.tts_model);
        let client = Client::builder().timeout(tts_config.timeout()).build()?;

        match tts_config.tts_model.as_str() {
            "gtts" => Ok(Arc::new(GoogleTTS::new(&tts_config.gtts, client))),
            "http_tts" => {
                let http_config = tts_config
                    .http_tts
                    .as_ref()
                    .ok_or_else(|| anyhow::anyhow!("tts_model is http_tts but http_tts section is missing"))?;
                Ok(Arc::new(HttpTTSClient::new(http_config, client)))
            }
            other => anyhow::bail!("Unknown tts_model: {}", other),
        }
    }
}
