use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// Audio extensions this service writes and the sweeper is allowed to delete
pub const MANAGED_EXTENSIONS: [&str; 4] = ["mp3", "wav", "webm", "ogg"];

const DEFAULT_INPUT_EXTENSION: &str = "webm";

/// Staging area for uploaded and synthesized audio.
///
/// Every file name is prefixed with the request UUID, so concurrent
/// requests never share a path.
#[derive(Debug, Clone)]
pub struct TempStore {
    upload_dir: PathBuf,
    output_dir: PathBuf,
}

impl TempStore {
    pub fn new(upload_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn ensure_dirs(&self) -> io::Result<()> {
        std::fs::create_dir_all(&self.upload_dir)?;
        std::fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn directories(&self) -> Vec<PathBuf> {
        vec![self.upload_dir().to_path_buf(), self.output_dir().to_path_buf()]
    }

    pub fn input_path(&self, request_id: Uuid, extension: &str) -> PathBuf {
        self.upload_dir
            .join(format!("{}_input.{}", request_id, extension))
    }

    pub fn output_file_name(request_id: Uuid) -> String {
        format!("{}_translated.mp3", request_id)
    }

    pub async fn stage_input(
        &self,
        request_id: Uuid,
        extension: &str,
        bytes: &[u8],
    ) -> io::Result<PathBuf> {
        let path = self.input_path(request_id, extension);
        tokio::fs::write(&path, bytes).await?;
        debug!("Staged {} bytes at {}", bytes.len(), path.display());
        Ok(path)
    }

    /// Write synthesized audio and return the generated file name
    pub async fn write_output(&self, request_id: Uuid, bytes: &[u8]) -> io::Result<String> {
        let file_name = Self::output_file_name(request_id);
        let path = self.output_dir.join(&file_name);
        tokio::fs::write(&path, bytes).await?;
        debug!("Saved synthesized audio to {}", path.display());
        Ok(file_name)
    }

    /// Best-effort delete; failures are only logged
    pub async fn remove_quietly(&self, path: &Path) {
        match tokio::fs::remove_file(path).await {
            Ok(()) => debug!("Removed temporary file {}", path.display()),
            Err(e) => debug!("Could not remove {}: {}", path.display(), e),
        }
    }
}

/// Pick the staging extension from the client's file name, if it is one we manage
pub fn input_extension(filename: Option<&str>) -> &'static str {
    filename
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .and_then(|ext| MANAGED_EXTENSIONS.iter().copied().find(|known| *known == ext))
        .unwrap_or(DEFAULT_INPUT_EXTENSION)
}

pub fn is_managed_audio(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| MANAGED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
