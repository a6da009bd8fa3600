use serde::{Deserialize, Serialize};
use crate::config_manager::asr::ASRConfig;
use crate::config_manager::pipeline::PipelineConfig;
use crate::config_manager::system::SystemConfig;
use crate::config_manager::translate::TranslateConfig;
use crate::config_manager::tts::TTSConfig;

/// Main configuration for the application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "system_config")]
    #[serde(default)]
    pub system_config: SystemConfig,

    #[serde(rename = "asr_config")]
    #[serde(default)]
    pub asr_config: ASRConfig,

    #[serde(rename = "translate_config")]
    #[serde(default)]
    pub translate_config: TranslateConfig,

    #[serde(rename = "tts_config")]
    #[serde(default)]
    pub tts_config: TTSConfig,

    #[serde(rename = "pipeline_config")]
    #[serde(default)]
    pub pipeline_config: PipelineConfig,
}

impl Config {
    /// Load configuration from a YAML or JSON file, chosen by extension
    pub fn load(path: &str) -> anyhow::Result<Self> {
        use crate::config_manager::utils::read_config_text;
        let content = read_config_text(path)?;

        let path_lower = path.to_lowercase();
        let config: Config = if path_lower.ends_with(".json") {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };

        config.system_config.validate()?;
        Ok(config)
    }
}
