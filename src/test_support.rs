//! In-memory stand-ins for the external speech services.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::asr::{ASRInterface, Transcription};
use crate::error::ServiceError;
use crate::translate::{InstalledLanguage, TranslateInterface};
use crate::tts::TTSInterface;

/// Translates by tagging text with the target code, e.g. `fr(Hello)`
#[derive(Default)]
pub struct FakeTranslator {
    pairs: HashSet<(String, String)>,
    hanging: HashSet<(String, String)>,
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pair(mut self, source: &str, target: &str) -> Self {
        self.pairs.insert((source.to_string(), target.to_string()));
        self
    }

    /// Calls for this pair never return
    pub fn with_hanging_pair(mut self, source: &str, target: &str) -> Self {
        self.hanging.insert((source.to_string(), target.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranslateInterface for FakeTranslator {
    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String, ServiceError> {
        let key = (source_lang.to_string(), target_lang.to_string());
        self.calls.lock().unwrap().push(key.clone());

        if self.hanging.contains(&key) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if self.pairs.contains(&key) {
            Ok(format!("{}({})", target_lang, text))
        } else {
            Err(ServiceError::Status {
                service: "translation",
                status: 400,
                body: format!("{} -> {} is not installed", source_lang, target_lang),
            })
        }
    }

    async fn installed_languages(&self) -> Result<Vec<InstalledLanguage>, ServiceError> {
        let mut by_source: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (source, target) in &self.pairs {
            by_source.entry(source.clone()).or_default().push(target.clone());
        }
        Ok(by_source
            .into_iter()
            .map(|(code, targets)| InstalledLanguage { name: code.clone(), code, targets })
            .collect())
    }
}

/// Returns a fixed transcript and records which staged files it was given
pub struct FakeASR {
    result: Result<Transcription, String>,
    delay: Duration,
    seen: Mutex<Vec<(PathBuf, bool)>>,
}

impl FakeASR {
    pub fn speaking(text: &str, language: &str) -> Self {
        Self {
            result: Ok(Transcription {
                text: text.to_string(),
                language: language.to_string(),
                segments: Vec::new(),
            }),
            delay: Duration::ZERO,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            delay: Duration::ZERO,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Paths received, with whether the file existed at call time
    pub fn seen(&self) -> Vec<(PathBuf, bool)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ASRInterface for FakeASR {
    async fn transcribe_file(&self, audio_path: &Path) -> Result<Transcription, ServiceError> {
        self.seen
            .lock()
            .unwrap()
            .push((audio_path.to_path_buf(), audio_path.exists()));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.result.clone().map_err(|message| ServiceError::InvalidResponse {
            service: "transcription",
            message,
        })
    }
}

/// Produces a tiny fake MP3 payload, or fails on demand
#[derive(Default)]
pub struct FakeTTS {
    fail: bool,
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeTTS {
    pub fn working() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TTSInterface for FakeTTS {
    async fn generate_audio(&self, text: &str, language: &str) -> Result<Vec<u8>, ServiceError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), language.to_string()));
        if self.fail {
            return Err(ServiceError::Status {
                service: "synthesis",
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(b"ID3fake-mp3".to_vec())
    }
}
