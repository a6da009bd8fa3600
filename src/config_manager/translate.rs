use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the LibreTranslate (Argos) translation server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    #[serde(rename = "base_url")]
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(rename = "api_key")]
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(rename = "timeout_secs")]
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Bridge language used when no direct model exists for a pair
    #[serde(rename = "pivot_language")]
    #[serde(default = "default_pivot_language")]
    pub pivot_language: String,
}

fn default_base_url() -> String {
    "http://localhost:5050".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_pivot_language() -> String {
    "en".to_string()
}

impl TranslateConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            pivot_language: default_pivot_language(),
        }
    }
}
