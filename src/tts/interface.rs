use async_trait::async_trait;

use crate::error::ServiceError;

/// TTS interface trait
#[async_trait]
pub trait TTSInterface: Send + Sync {
    /// Generate MP3 audio for `text` spoken in `language`
    ///
    /// # Arguments
    /// * `text` - The text to synthesize
    /// * `language` - Synthesis voice code from the language catalog
    ///
    /// # Returns
    /// Encoded audio bytes
    async fn generate_audio(&self, text: &str, language: &str) -> Result<Vec<u8>, ServiceError>;
}
