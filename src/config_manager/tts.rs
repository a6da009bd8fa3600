use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Google Translate TTS endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GTTSConfig {
    #[serde(rename = "base_url")]
    #[serde(default = "default_gtts_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub slow: bool,
}

fn default_gtts_base_url() -> String {
    "https://translate.google.com".to_string()
}

impl Default for GTTSConfig {
    fn default() -> Self {
        Self {
            base_url: default_gtts_base_url(),
            slow: false,
        }
    }
}

/// Configuration for a generic HTTP TTS service returning raw audio
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpTTSConfig {
    #[serde(rename = "base_url")]
    pub base_url: String,

    #[serde(default)]
    pub voice: Option<String>,
}

/// TTS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TTSConfig {
    #[serde(rename = "tts_model")]
    #[serde(default = "default_tts_model")]
    pub tts_model: String,

    #[serde(default)]
    pub gtts: GTTSConfig,

    #[serde(rename = "http_tts")]
    #[serde(default)]
    pub http_tts: Option<HttpTTSConfig>,

    #[serde(rename = "timeout_secs")]
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_tts_model() -> String {
    "gtts".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl TTSConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for TTSConfig {
    fn default() -> Self {
        Self {
            tts_model: default_tts_model(),
            gtts: GTTSConfig::default(),
            http_tts: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}
