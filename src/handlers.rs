use axum::{
    extract::{multipart::MultipartError, multipart::MultipartRejection, Multipart, State},
    http::{StatusCode, Uri},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::error::{ApiError, ValidationReason};
use crate::languages::LanguageSummary;
use crate::pipeline::TranslationRequest;
use crate::state::AppState;
use crate::translate::count_pairs;
use crate::utils::deadline::with_timeout;

const TEST_SENTENCE: &str = "Hello, how are you today?";

#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub app: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub transcription_service: String,
    pub translation_pairs: usize,
    pub installed_languages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation_error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Fields pulled out of a multipart upload
#[derive(Debug, Default)]
struct Upload {
    audio: Option<Vec<u8>>,
    filename: Option<String>,
    lang: Option<String>,
}

/// Only reached when the whole body trips the router's outer limit
fn multipart_error(err: MultipartError, max_audio_bytes: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ValidationReason::TooLarge {
            limit: max_audio_bytes,
        }
        .into()
    } else {
        warn!("Malformed multipart upload: {}", err.body_text());
        ValidationReason::MalformedUpload.into()
    }
}

/// Audio past `max_audio_bytes + 1` is read and dropped so later fields such
/// as `lang` still arrive and validation can pick the right reason.
async fn read_upload(
    multipart: Result<Multipart, MultipartRejection>,
    max_audio_bytes: usize,
) -> Result<Upload, ApiError> {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            warn!("Request is not a multipart upload: {}", rejection);
            return Err(ValidationReason::MissingAudio.into());
        }
    };

    let to_api_error = |err: MultipartError| multipart_error(err, max_audio_bytes);
    let keep = max_audio_bytes.saturating_add(1);

    let mut upload = Upload::default();
    while let Some(mut field) = multipart.next_field().await.map_err(to_api_error)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("audio") => {
                upload.filename = field.file_name().map(str::to_owned);
                let mut audio = Vec::new();
                let mut received = 0usize;
                while let Some(chunk) = field.chunk().await.map_err(to_api_error)? {
                    received += chunk.len();
                    let room = keep.saturating_sub(audio.len());
                    audio.extend_from_slice(&chunk[..chunk.len().min(room)]);
                }
                if received > audio.len() {
                    debug!("Dropped {} audio bytes past the upload limit", received - audio.len());
                }
                upload.audio = Some(audio);
            }
            Some("lang") => {
                upload.lang = Some(field.text().await.map_err(to_api_error)?);
            }
            _ => {}
        }
    }
    Ok(upload)
}

pub async fn home() -> Json<ServiceStatus> {
    Json(ServiceStatus {
        app: "AI Voice Translator",
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
        timestamp: Utc::now(),
    })
}

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    let timeout = state.config.translate_config.timeout();
    let installed = with_timeout("translation", timeout, state.translator().installed_languages()).await;

    let (translation_pairs, installed_languages, translation_error) = match installed {
        Ok(languages) => (
            count_pairs(&languages),
            languages.into_iter().map(|l| l.code).collect(),
            None,
        ),
        Err(e) => {
            warn!("Could not list installed translation languages: {}", e);
            (0, Vec::new(), Some(e.to_string()))
        }
    };

    Json(HealthStatus {
        status: "healthy",
        transcription_service: state.config.asr_config.base_url.clone(),
        translation_pairs,
        installed_languages,
        translation_error,
        timestamp: Utc::now(),
    })
}

pub async fn languages(State(state): State<AppState>) -> Json<Vec<LanguageSummary>> {
    Json(state.catalog.list().iter().map(LanguageSummary::from).collect())
}

pub async fn translate_audio(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    let upload = read_upload(multipart, state.config.system_config.max_upload_bytes).await?;
    let request = TranslationRequest {
        audio: upload.audio,
        filename: upload.filename,
        target_language: upload.lang.unwrap_or_else(|| "en".to_string()),
    };

    let result = state.pipeline.handle(request).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Translation completed",
        "data": result,
    })))
}

/// Operator check: push a fixed English sentence through the translator
pub async fn test_translation(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    info!("Testing translation: '{}' (en -> fr)", TEST_SENTENCE);
    let outcome = state
        .pipeline
        .orchestrator()
        .resolve(TEST_SENTENCE, "en", "fr")
        .await;

    if !outcome.succeeded() {
        return Err(ApiError::internal(outcome.text()));
    }

    Ok(Json(json!({
        "success": true,
        "original": TEST_SENTENCE,
        "translated": outcome.text(),
        "route": outcome.route(),
        "from": "en",
        "to": "fr",
    })))
}

/// Operator check: transcribe an upload without translating it
pub async fn debug_transcription(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    let upload = read_upload(multipart, state.config.system_config.max_upload_bytes).await?;
    let transcription = state
        .pipeline
        .transcribe_upload(upload.audio.as_deref(), upload.filename.as_deref())
        .await?;

    Ok(Json(json!({
        "success": true,
        "text": transcription.text,
        "language": transcription.language,
        "segments": transcription.segments.len(),
    })))
}

pub async fn audio_not_found(uri: Uri) -> (StatusCode, Json<Value>) {
    let name = uri.path().trim_start_matches('/');
    warn!("Audio file not found: {}", name);
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("Audio file not found: {}", name) })),
    )
}
