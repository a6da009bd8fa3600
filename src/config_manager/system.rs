use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// System configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(rename = "upload_dir")]
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,

    #[serde(rename = "output_dir")]
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Age after which staged and synthesized audio may be swept
    #[serde(rename = "retention_secs")]
    #[serde(default = "default_retention_secs")]
    pub retention_secs: u64,

    #[serde(rename = "sweep_interval_secs")]
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    #[serde(rename = "max_upload_bytes")]
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_upload_dir() -> String {
    "temp_uploads".to_string()
}

fn default_output_dir() -> String {
    "temp_outputs".to_string()
}

fn default_retention_secs() -> u64 {
    3600
}

fn default_sweep_interval_secs() -> u64 {
    600
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

impl SystemConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_upload_bytes == 0 {
            anyhow::bail!("max_upload_bytes must be greater than zero");
        }
        if self.sweep_interval_secs == 0 {
            anyhow::bail!("sweep_interval_secs must be greater than zero");
        }
        if self.upload_dir.trim().is_empty() || self.output_dir.trim().is_empty() {
            anyhow::bail!("upload_dir and output_dir must not be empty");
        }
        Ok(())
    }

    pub fn upload_path(&self) -> PathBuf {
        PathBuf::from(&self.upload_dir)
    }

    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(&self.output_dir)
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            upload_dir: default_upload_dir(),
            output_dir: default_output_dir(),
            retention_secs: default_retention_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}
