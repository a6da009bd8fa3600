use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::interface::TranslateInterface;
use crate::error::ServiceError;
use crate::utils::deadline::with_timeout;

/// How a translation was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationRoute {
    /// Source and target were the same language
    Identity,
    Direct,
    /// Two hops through the pivot language
    Pivot,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    Translated { text: String, route: TranslationRoute },
    Failed { source: String, target: String },
}

impl TranslationOutcome {
    /// Text to show and speak. A failure renders as the
    /// `[Translation failed: xx→yy]` marker older clients expect.
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Self::Translated { text, .. } => Cow::Borrowed(text),
            Self::Failed { source, target } => {
                Cow::Owned(format!("[Translation failed: {}→{}]", source, target))
            }
        }
    }

    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Translated { .. })
    }

    pub fn route(&self) -> TranslationRoute {
        match self {
            Self::Translated { route, .. } => *route,
            Self::Failed { .. } => TranslationRoute::Failed,
        }
    }
}

/// Direct translation with a single fallback through a bridge language
pub struct TranslationOrchestrator {
    translator: Arc<dyn TranslateInterface>,
    pivot_language: String,
    timeout: Duration,
}

impl TranslationOrchestrator {
    pub fn new(translator: Arc<dyn TranslateInterface>, pivot_language: impl Into<String>, timeout: Duration) -> Self {
        Self {
            translator,
            pivot_language: pivot_language.into(),
            timeout,
        }
    }

    pub fn translator(&self) -> &Arc<dyn TranslateInterface> {
        &self.translator
    }

    pub async fn resolve(&self, text: &str, source: &str, target: &str) -> TranslationOutcome {
        if source == target {
            debug!("Same language ({}), no translation needed", source);
            return TranslationOutcome::Translated {
                text: text.to_string(),
                route: TranslationRoute::Identity,
            };
        }

        match self.hop(text, source, target).await {
            Ok(translated) => {
                info!("Direct translation {} -> {} succeeded", source, target);
                return TranslationOutcome::Translated {
                    text: translated,
                    route: TranslationRoute::Direct,
                };
            }
            Err(e) => warn!("Direct translation {} -> {} failed: {}", source, target, e),
        }

        let pivot = self.pivot_language.as_str();
        if source != pivot && target != pivot {
            match self.via_pivot(text, source, target).await {
                Ok(translated) => {
                    info!("Pivot translation {} -> {} -> {} succeeded", source, pivot, target);
                    return TranslationOutcome::Translated {
                        text: translated,
                        route: TranslationRoute::Pivot,
                    };
                }
                Err(e) => warn!("Pivot translation through {} failed: {}", pivot, e),
            }
        } else {
            debug!("Pivot through {} not applicable for {} -> {}", pivot, source, target);
        }

        TranslationOutcome::Failed {
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    async fn via_pivot(&self, text: &str, source: &str, target: &str) -> Result<String, ServiceError> {
        let bridged = self.hop(text, source, &self.pivot_language).await?;
        debug!("Pivot text: '{}'", bridged);
        self.hop(&bridged, &self.pivot_language, target).await
    }

    async fn hop(&self, text: &str, source: &str, target: &str) -> Result<String, ServiceError> {
        with_timeout(
            "translation",
            self.timeout,
            self.translator.translate(text, source, target),
        )
        .await
    }
}
