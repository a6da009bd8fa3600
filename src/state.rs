use std::sync::Arc;

use crate::asr::{ASRInterface, WhisperClient};
use crate::config_manager::Config;
use crate::languages::LanguageCatalog;
use crate::pipeline::{PipelineOptions, RequestPipeline};
use crate::temp_files::TempStore;
use crate::translate::{LibreTranslateClient, TranslateInterface, TranslationOrchestrator};
use crate::tts::{TTSFactory, TTSInterface};

/// Process-wide state, built once at startup and shared read-only by handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<LanguageCatalog>,
    pub store: Arc<TempStore>,
    pub pipeline: Arc<RequestPipeline>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let asr: Arc<dyn ASRInterface> = Arc::new(WhisperClient::new(&config.asr_config)?);
        let translator: Arc<dyn TranslateInterface> =
            Arc::new(LibreTranslateClient::new(&config.translate_config)?);
        let tts = TTSFactory::create_tts(&config.tts_config)?;

        Ok(Self::from_parts(config, asr, translator, tts))
    }

    pub fn from_parts(
        config: Config,
        asr: Arc<dyn ASRInterface>,
        translator: Arc<dyn TranslateInterface>,
        tts: Arc<dyn TTSInterface>,
    ) -> Self {
        let catalog = Arc::new(LanguageCatalog::builtin());
        let store = Arc::new(TempStore::new(
            config.system_config.upload_path(),
            config.system_config.output_path(),
        ));
        let orchestrator = TranslationOrchestrator::new(
            translator,
            config.translate_config.pivot_language.clone(),
            config.translate_config.timeout(),
        );
        let pipeline = RequestPipeline::new(
            catalog.clone(),
            store.clone(),
            asr,
            orchestrator,
            tts,
            PipelineOptions::from_config(&config),
        );

        Self {
            config: Arc::new(config),
            catalog,
            store,
            pipeline: Arc::new(pipeline),
        }
    }

    pub fn translator(&self) -> &Arc<dyn TranslateInterface> {
        self.pipeline.orchestrator().translator()
    }
}
