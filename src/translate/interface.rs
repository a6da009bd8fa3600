use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// A source language installed on the translation server and the targets it can reach
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledLanguage {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub targets: Vec<String>,
}

/// Count direct translation pairs, ignoring a language's mapping to itself
pub fn count_pairs(languages: &[InstalledLanguage]) -> usize {
    languages
        .iter()
        .map(|lang| lang.targets.iter().filter(|t| **t != lang.code).count())
        .sum()
}

/// Machine translation engine
#[async_trait]
pub trait TranslateInterface: Send + Sync {
    /// Translate `text` from one language code to another. Fails when the
    /// engine has no model for the pair.
    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String, ServiceError>;

    async fn installed_languages(&self) -> Result<Vec<InstalledLanguage>, ServiceError>;
}
