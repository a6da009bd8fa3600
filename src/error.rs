use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::borrow::Cow;
use thiserror::Error;

/// Failure talking to one of the external speech/translation services
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} returned status {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("{service} did not answer within {seconds}s")]
    Timeout { service: &'static str, seconds: u64 },

    #[error("{service} returned an unusable response: {message}")]
    InvalidResponse {
        service: &'static str,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Caller-correctable problems with a translation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationReason {
    MissingAudio,
    UnsupportedLanguage,
    EmptyAudio,
    /// Carries the configured limit in bytes
    TooLarge { limit: usize },
    MalformedUpload,
    NoSpeechDetected,
}

impl ValidationReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingAudio => "missing_audio",
            Self::UnsupportedLanguage => "unsupported_language",
            Self::EmptyAudio => "empty_audio",
            Self::TooLarge { .. } => "too_large",
            Self::MalformedUpload => "malformed_upload",
            Self::NoSpeechDetected => "no_speech_detected",
        }
    }

    pub fn message(self) -> Cow<'static, str> {
        match self {
            Self::MissingAudio => "No audio file provided".into(),
            Self::UnsupportedLanguage => "Unsupported target language".into(),
            Self::EmptyAudio => "Empty audio file".into(),
            Self::TooLarge { limit } => format!("Audio too large (max {})", format_size(limit)).into(),
            Self::MalformedUpload => "Malformed multipart upload".into(),
            Self::NoSpeechDetected => "No speech detected".into(),
        }
    }
}

fn format_size(bytes: usize) -> String {
    const MIB: usize = 1024 * 1024;
    const KIB: usize = 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else if bytes >= KIB && bytes % KIB == 0 {
        format!("{}KB", bytes / KIB)
    } else {
        format!("{} bytes", bytes)
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{}", .0.message())]
    Validation(ValidationReason),

    #[error("Failed to stage audio: {0}")]
    Staging(#[source] std::io::Error),

    #[error("Transcription failed: {0}")]
    TranscriptionFailed(#[source] ServiceError),
}

impl PipelineError {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Validation(reason) => reason.as_str(),
            Self::Staging(_) => "staging_failed",
            Self::TranscriptionFailed(_) => "transcription_failed",
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<ValidationReason> for PipelineError {
    fn from(reason: ValidationReason) -> Self {
        Self::Validation(reason)
    }
}

/// Error returned by HTTP handlers, rendered as `{"error", "reason"}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    reason: &'static str,
    message: String,
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            reason: "internal_error",
            message: message.into(),
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(error: PipelineError) -> Self {
        let status = if error.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            reason: error.reason(),
            message: error.to_string(),
        }
    }
}

impl From<ValidationReason> for ApiError {
    fn from(reason: ValidationReason) -> Self {
        PipelineError::from(reason).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "error": self.message,
                "reason": self.reason,
            })),
        )
            .into_response()
    }
}
