use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::asr::{ASRInterface, Transcription};
use crate::config_manager::Config;
use crate::error::{PipelineError, ServiceError, ValidationReason};
use crate::languages::{LanguageCatalog, LanguageEntry};
use crate::temp_files::{input_extension, TempStore};
use crate::translate::{TranslationOrchestrator, TranslationRoute};
use crate::tts::TTSInterface;
use crate::utils::deadline::with_timeout;

/// One uploaded clip and the language it should come back in
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    pub audio: Option<Vec<u8>>,
    pub filename: Option<String>,
    pub target_language: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranslationResult {
    pub original_text: String,
    pub translated_text: String,
    pub translation_succeeded: bool,
    pub translation_route: TranslationRoute,
    pub detected_language: String,
    pub detected_language_name: String,
    pub target_language: String,
    pub target_language_name: String,
    pub audio_url: Option<String>,
    pub processing_time: String,
    pub processing_time_secs: f64,
    pub request_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub max_audio_bytes: usize,
    pub transcription_timeout: Duration,
    pub synthesis_timeout: Duration,
    pub synthesize_failed_translations: bool,
}

impl PipelineOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_audio_bytes: config.system_config.max_upload_bytes,
            transcription_timeout: config.asr_config.timeout(),
            synthesis_timeout: config.tts_config.timeout(),
            synthesize_failed_translations: config.pipeline_config.synthesize_failed_translations,
        }
    }
}

/// Runs validate → stage → transcribe → translate → synthesize → clean up,
/// strictly in that order, for a single request.
pub struct RequestPipeline {
    catalog: Arc<LanguageCatalog>,
    store: Arc<TempStore>,
    asr: Arc<dyn ASRInterface>,
    orchestrator: TranslationOrchestrator,
    tts: Arc<dyn TTSInterface>,
    options: PipelineOptions,
}

impl RequestPipeline {
    pub fn new(
        catalog: Arc<LanguageCatalog>,
        store: Arc<TempStore>,
        asr: Arc<dyn ASRInterface>,
        orchestrator: TranslationOrchestrator,
        tts: Arc<dyn TTSInterface>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            catalog,
            store,
            asr,
            orchestrator,
            tts,
            options,
        }
    }

    pub fn orchestrator(&self) -> &TranslationOrchestrator {
        &self.orchestrator
    }

    /// Checks, in order: audio present, target supported, non-empty, within size limit
    pub fn validate<'a>(
        &'a self,
        request: &'a TranslationRequest,
    ) -> Result<(&'a [u8], &'a LanguageEntry), PipelineError> {
        let audio = request
            .audio
            .as_deref()
            .ok_or(ValidationReason::MissingAudio)?;
        let target = self
            .catalog
            .get(&request.target_language)
            .ok_or(ValidationReason::UnsupportedLanguage)?;
        self.check_size(audio)?;
        Ok((audio, target))
    }

    fn check_size(&self, audio: &[u8]) -> Result<(), PipelineError> {
        if audio.is_empty() {
            return Err(ValidationReason::EmptyAudio.into());
        }
        if audio.len() > self.options.max_audio_bytes {
            return Err(ValidationReason::TooLarge {
                limit: self.options.max_audio_bytes,
            }
            .into());
        }
        Ok(())
    }

    pub async fn handle(&self, request: TranslationRequest) -> Result<TranslationResult, PipelineError> {
        let started = Instant::now();
        let request_id = Uuid::new_v4();

        let (audio, target) = match self.validate(&request) {
            Ok(valid) => valid,
            Err(e) => {
                warn!("[{}] Rejected request: {}", request_id, e.reason());
                return Err(e);
            }
        };
        info!(
            "[{}] New translation request: {} bytes, target {}",
            request_id,
            audio.len(),
            target.code
        );

        let input_path = self.stage(request_id, request.filename.as_deref(), audio).await?;
        let transcription = self.transcribe_staged(request_id, &input_path).await?;

        let original_text = transcription.text.trim().to_string();
        let detected = transcription.language;
        info!("[{}] Detected language: {}", request_id, detected);
        debug!("[{}] Original text: '{}'", request_id, original_text);

        let outcome = self
            .orchestrator
            .resolve(&original_text, &detected, target.code)
            .await;
        let translated_text = outcome.text().into_owned();
        debug!("[{}] Translated text: '{}'", request_id, translated_text);

        let audio_url = if outcome.succeeded() || self.options.synthesize_failed_translations {
            self.synthesize(request_id, &translated_text, target).await
        } else {
            info!("[{}] Translation failed, skipping speech synthesis", request_id);
            None
        };

        self.store.remove_quietly(&input_path).await;

        let elapsed = started.elapsed().as_secs_f64();
        info!("[{}] Total processing time: {:.2}s", request_id, elapsed);

        Ok(TranslationResult {
            original_text,
            translated_text,
            translation_succeeded: outcome.succeeded(),
            translation_route: outcome.route(),
            detected_language_name: self.catalog.display_name(&detected).to_string(),
            detected_language: detected,
            target_language: target.code.to_string(),
            target_language_name: target.display_name.to_string(),
            audio_url,
            processing_time: format!("{:.2}s", elapsed),
            processing_time_secs: elapsed,
            request_id,
        })
    }

    /// Stage and transcribe an upload without translating it. Silence is
    /// returned as an empty transcript rather than rejected.
    pub async fn transcribe_upload(
        &self,
        audio: Option<&[u8]>,
        filename: Option<&str>,
    ) -> Result<Transcription, PipelineError> {
        let audio = audio.ok_or(ValidationReason::MissingAudio)?;
        self.check_size(audio)?;

        let request_id = Uuid::new_v4();
        let input_path = self.stage(request_id, filename, audio).await?;
        let transcription = self.transcribe(request_id, &input_path).await;
        self.store.remove_quietly(&input_path).await;
        transcription
    }

    async fn stage(
        &self,
        request_id: Uuid,
        filename: Option<&str>,
        audio: &[u8],
    ) -> Result<std::path::PathBuf, PipelineError> {
        let extension = input_extension(filename);
        match self.store.stage_input(request_id, extension, audio).await {
            Ok(path) => Ok(path),
            Err(e) => {
                error!("[{}] Could not stage upload: {}", request_id, e);
                let path = self.store.input_path(request_id, extension);
                self.store.remove_quietly(&path).await;
                Err(PipelineError::Staging(e))
            }
        }
    }

    /// Transcribe the staged file. On failure or silence the staged file is
    /// removed before returning the error.
    async fn transcribe_staged(
        &self,
        request_id: Uuid,
        input_path: &Path,
    ) -> Result<Transcription, PipelineError> {
        let transcription = self.transcribe(request_id, input_path).await?;
        if transcription.text.trim().is_empty() {
            warn!("[{}] No speech detected", request_id);
            self.store.remove_quietly(input_path).await;
            return Err(ValidationReason::NoSpeechDetected.into());
        }
        Ok(transcription)
    }

    async fn transcribe(&self, request_id: Uuid, input_path: &Path) -> Result<Transcription, PipelineError> {
        let result = with_timeout(
            "transcription",
            self.options.transcription_timeout,
            self.asr.transcribe_file(input_path),
        )
        .await;

        match result {
            Ok(transcription) => Ok(transcription),
            Err(e) => {
                error!("[{}] Transcription error: {}", request_id, e);
                self.store.remove_quietly(input_path).await;
                Err(PipelineError::TranscriptionFailed(e))
            }
        }
    }

    /// Synthesis failures are logged and reported as a missing audio URL
    async fn synthesize(&self, request_id: Uuid, text: &str, target: &LanguageEntry) -> Option<String> {
        let audio = with_timeout(
            "synthesis",
            self.options.synthesis_timeout,
            self.tts.generate_audio(text, target.synthesis_voice_code),
        )
        .await;

        let saved = match audio {
            Ok(bytes) => self
                .store
                .write_output(request_id, &bytes)
                .await
                .map_err(ServiceError::from),
            Err(e) => Err(e),
        };

        match saved {
            Ok(file_name) => {
                info!("[{}] Audio saved: {}", request_id, file_name);
                Some(format!("/audio/{}", file_name))
            }
            Err(e) => {
                warn!("[{}] TTS failed: {}", request_id, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeASR, FakeTTS, FakeTranslator};
    use crate::translate::TranslateInterface;
    use std::collections::HashSet;
    use tempfile::TempDir;

    const TEN_MIB: usize = 10 * 1024 * 1024;

    struct Harness {
        _dir: TempDir,
        store: Arc<TempStore>,
        asr: Arc<FakeASR>,
        tts: Arc<FakeTTS>,
        pipeline: Arc<RequestPipeline>,
    }

    fn harness_with(asr: FakeASR, translator: FakeTranslator, tts: FakeTTS, synthesize_failed: bool) -> Harness {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(TempStore::new(dir.path().join("up"), dir.path().join("out")));
        store.ensure_dirs().unwrap();

        let asr = Arc::new(asr);
        let tts = Arc::new(tts);
        let translator: Arc<dyn TranslateInterface> = Arc::new(translator);
        let pipeline = RequestPipeline::new(
            Arc::new(LanguageCatalog::builtin()),
            store.clone(),
            asr.clone(),
            TranslationOrchestrator::new(translator, "en", Duration::from_secs(1)),
            tts.clone(),
            PipelineOptions {
                max_audio_bytes: TEN_MIB,
                transcription_timeout: Duration::from_secs(1),
                synthesis_timeout: Duration::from_secs(1),
                synthesize_failed_translations: synthesize_failed,
            },
        );

        Harness {
            _dir: dir,
            store,
            asr,
            tts,
            pipeline: Arc::new(pipeline),
        }
    }

    fn harness(asr: FakeASR, translator: FakeTranslator, tts: FakeTTS) -> Harness {
        harness_with(asr, translator, tts, false)
    }

    fn request(audio: Option<Vec<u8>>, lang: &str) -> TranslationRequest {
        TranslationRequest {
            audio,
            filename: Some("clip.webm".to_string()),
            target_language: lang.to_string(),
        }
    }

    fn dir_is_empty(path: &Path) -> bool {
        std::fs::read_dir(path).unwrap().next().is_none()
    }

    fn reason(err: PipelineError) -> &'static str {
        err.reason()
    }

    #[tokio::test]
    async fn missing_audio_is_checked_first() {
        let h = harness(FakeASR::speaking("hi", "en"), FakeTranslator::new(), FakeTTS::working());
        let err = h.pipeline.handle(request(None, "xx")).await.unwrap_err();
        assert_eq!(reason(err), "missing_audio");
    }

    #[tokio::test]
    async fn unsupported_language_regardless_of_audio() {
        let h = harness(FakeASR::speaking("hi", "en"), FakeTranslator::new(), FakeTTS::working());
        for audio in [vec![], vec![1u8; 16], vec![0u8; TEN_MIB + 1]] {
            let err = h.pipeline.handle(request(Some(audio), "klingon")).await.unwrap_err();
            assert_eq!(reason(err), "unsupported_language");
        }
        assert!(h.asr.seen().is_empty());
    }

    #[tokio::test]
    async fn empty_audio_is_rejected() {
        let h = harness(FakeASR::speaking("hi", "en"), FakeTranslator::new(), FakeTTS::working());
        let err = h.pipeline.handle(request(Some(vec![]), "fr")).await.unwrap_err();
        assert_eq!(reason(err), "empty_audio");
    }

    #[test]
    fn size_limit_boundary() {
        let h = harness(FakeASR::speaking("hi", "en"), FakeTranslator::new(), FakeTTS::working());

        let at_limit = request(Some(vec![0u8; TEN_MIB]), "fr");
        assert!(h.pipeline.validate(&at_limit).is_ok());

        let over = request(Some(vec![0u8; TEN_MIB + 1]), "fr");
        let err = h.pipeline.validate(&over).unwrap_err();
        assert_eq!(reason(err), "too_large");
    }

    #[tokio::test]
    async fn oversized_upload_never_reaches_disk() {
        let h = harness(FakeASR::speaking("hi", "en"), FakeTranslator::new(), FakeTTS::working());
        let err = h
            .pipeline
            .handle(request(Some(vec![0u8; TEN_MIB + 1]), "fr"))
            .await
            .unwrap_err();
        assert_eq!(reason(err), "too_large");
        assert!(dir_is_empty(h.store.upload_dir()));
    }

    #[tokio::test]
    async fn english_clip_to_french() {
        let h = harness(
            FakeASR::speaking(" Hello, how are you today? ", "en"),
            FakeTranslator::new().with_pair("en", "fr"),
            FakeTTS::working(),
        );

        let result = h.pipeline.handle(request(Some(vec![7u8; 2048]), "fr")).await.unwrap();

        assert_eq!(result.original_text, "Hello, how are you today?");
        assert_eq!(result.translated_text, "fr(Hello, how are you today?)");
        assert_ne!(result.translated_text, result.original_text);
        assert!(result.translation_succeeded);
        assert_eq!(result.translation_route, TranslationRoute::Direct);
        assert_eq!(result.detected_language, "en");
        assert_eq!(result.detected_language_name, "English");
        assert_eq!(result.target_language_name, "French");
        assert_eq!(
            result.audio_url.as_deref(),
            Some(format!("/audio/{}_translated.mp3", result.request_id).as_str())
        );
        assert!(result.processing_time.ends_with('s'));

        let output = h.store.output_dir().join(format!("{}_translated.mp3", result.request_id));
        assert!(output.exists());
        assert!(dir_is_empty(h.store.upload_dir()));
        assert_eq!(
            h.tts.calls(),
            vec![("fr(Hello, how are you today?)".to_string(), "fr".to_string())]
        );
    }

    #[tokio::test]
    async fn staged_file_exists_during_transcription_and_keeps_upload_extension() {
        let h = harness(FakeASR::speaking("hola", "es"), FakeTranslator::new().with_pair("es", "en"), FakeTTS::working());
        let mut req = request(Some(vec![1u8; 10]), "en");
        req.filename = Some("voice.wav".to_string());

        h.pipeline.handle(req).await.unwrap();

        let seen = h.asr.seen();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].1, "staged file missing at transcription time");
        assert!(seen[0].0.to_string_lossy().ends_with("_input.wav"));
        assert!(!seen[0].0.exists());
    }

    #[tokio::test]
    async fn transcription_failure_cleans_up_and_reports() {
        let h = harness(FakeASR::failing("model crashed"), FakeTranslator::new(), FakeTTS::working());
        let err = h.pipeline.handle(request(Some(vec![1u8; 10]), "fr")).await.unwrap_err();

        assert_eq!(err.reason(), "transcription_failed");
        assert!(err.to_string().contains("model crashed"));
        assert!(dir_is_empty(h.store.upload_dir()));
    }

    #[tokio::test]
    async fn hung_transcription_times_out() {
        let h = harness(
            FakeASR::speaking("hi", "en").with_delay(Duration::from_secs(30)),
            FakeTranslator::new(),
            FakeTTS::working(),
        );
        let err = h.pipeline.handle(request(Some(vec![1u8; 10]), "fr")).await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::TranscriptionFailed(ServiceError::Timeout { .. })
        ));
        assert!(dir_is_empty(h.store.upload_dir()));
    }

    #[tokio::test]
    async fn silence_is_a_validation_error() {
        let h = harness(FakeASR::speaking("   \n ", "en"), FakeTranslator::new(), FakeTTS::working());
        let err = h.pipeline.handle(request(Some(vec![1u8; 10]), "fr")).await.unwrap_err();

        assert_eq!(err.reason(), "no_speech_detected");
        assert!(err.is_validation());
        assert!(dir_is_empty(h.store.upload_dir()));
    }

    #[tokio::test]
    async fn synthesis_failure_still_returns_text() {
        let h = harness(
            FakeASR::speaking("Hello", "en"),
            FakeTranslator::new().with_pair("en", "de"),
            FakeTTS::failing(),
        );
        let result = h.pipeline.handle(request(Some(vec![1u8; 10]), "de")).await.unwrap();

        assert_eq!(result.translated_text, "de(Hello)");
        assert!(result.audio_url.is_none());
        assert!(dir_is_empty(h.store.upload_dir()));
    }

    #[tokio::test]
    async fn failed_translation_is_flagged_and_not_spoken() {
        let h = harness(FakeASR::speaking("Bonjour", "fr"), FakeTranslator::new(), FakeTTS::working());
        let result = h.pipeline.handle(request(Some(vec![1u8; 10]), "de")).await.unwrap();

        assert!(!result.translation_succeeded);
        assert_eq!(result.translation_route, TranslationRoute::Failed);
        assert_eq!(result.translated_text, "[Translation failed: fr→de]");
        assert!(result.audio_url.is_none());
        assert!(h.tts.calls().is_empty());
    }

    #[tokio::test]
    async fn failed_translation_can_be_spoken_when_configured() {
        let h = harness_with(FakeASR::speaking("Bonjour", "fr"), FakeTranslator::new(), FakeTTS::working(), true);
        let result = h.pipeline.handle(request(Some(vec![1u8; 10]), "de")).await.unwrap();

        assert!(!result.translation_succeeded);
        assert!(result.audio_url.is_some());
        assert_eq!(h.tts.calls()[0].0, "[Translation failed: fr→de]");
    }

    #[tokio::test]
    async fn concurrent_requests_stage_distinct_files() {
        let h = harness(
            FakeASR::speaking("Hello", "en").with_delay(Duration::from_millis(20)),
            FakeTranslator::new(),
            FakeTTS::working(),
        );

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let pipeline = h.pipeline.clone();
                tokio::spawn(async move { pipeline.handle(request(Some(vec![3u8; 64]), "en")).await })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            let result = handle.await.unwrap().unwrap();
            ids.insert(result.request_id);
        }
        assert_eq!(ids.len(), 16);

        let seen = h.asr.seen();
        let paths: HashSet<_> = seen.iter().map(|(p, _)| p.clone()).collect();
        assert_eq!(paths.len(), 16);
        assert!(seen.iter().all(|(_, existed)| *existed));
        assert!(dir_is_empty(h.store.upload_dir()));
    }

    #[tokio::test]
    async fn transcribe_upload_cleans_up() {
        let h = harness(FakeASR::speaking("testing", "en"), FakeTranslator::new(), FakeTTS::working());
        let transcription = h.pipeline.transcribe_upload(Some(b"abc".as_slice()), Some("a.ogg")).await.unwrap();
        assert_eq!(transcription.text, "testing");
        assert!(dir_is_empty(h.store.upload_dir()));

        let err = h.pipeline.transcribe_upload(None, None).await.unwrap_err();
        assert_eq!(err.reason(), "missing_audio");
    }

    #[tokio::test]
    async fn transcribe_upload_reports_silence_as_empty_text() {
        let h = harness(FakeASR::speaking("  ", "en"), FakeTranslator::new(), FakeTTS::working());
        let transcription = h.pipeline.transcribe_upload(Some(b"abc".as_slice()), None).await.unwrap();
        assert_eq!(transcription.text.trim(), "");
        assert_eq!(transcription.language, "en");
        assert!(dir_is_empty(h.store.upload_dir()));
    }

    #[tokio::test]
    async fn too_large_message_uses_pipeline_limit() {
        let h = harness(FakeASR::speaking("hi", "en"), FakeTranslator::new(), FakeTTS::working());
        let err = h
            .pipeline
            .handle(request(Some(vec![0u8; TEN_MIB + 1]), "fr"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Audio too large (max 10MB)");
    }
}
