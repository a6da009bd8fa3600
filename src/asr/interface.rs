use std::path::Path;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// A timed piece of the recognized text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Result of speech recognition on one audio file
#[derive(Debug, Clone, PartialEq)]
pub struct Transcription {
    pub text: String,
    /// Detected source language, ISO 639-1
    pub language: String,
    pub segments: Vec<TranscriptSegment>,
}

/// Speech-to-text engine
#[async_trait]
pub trait ASRInterface: Send + Sync {
    /// Transcribe a staged audio file, detecting its language
    async fn transcribe_file(&self, audio_path: &Path) -> Result<Transcription, ServiceError>;
}
