use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Synthesize audio even when translation fell back to the failure marker
    #[serde(rename = "synthesize_failed_translations")]
    #[serde(default)]
    pub synthesize_failed_translations: bool,
}
