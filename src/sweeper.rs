use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::temp_files::is_managed_audio;

/// Deletes managed audio files older than the retention window
#[derive(Debug, Clone)]
pub struct RetentionSweeper {
    directories: Vec<PathBuf>,
    max_age: Duration,
}

impl RetentionSweeper {
    pub fn new(directories: Vec<PathBuf>, max_age: Duration) -> Self {
        Self { directories, max_age }
    }

    /// Sweep now; returns the number of deleted files
    pub fn sweep(&self) -> usize {
        self.sweep_at(SystemTime::now())
    }

    pub fn sweep_at(&self, now: SystemTime) -> usize {
        let mut removed = 0;

        for dir in &self.directories {
            let entries = match std::fs::read_dir(dir) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Cleanup skipped {}: {}", dir.display(), e);
                    continue;
                }
            };

            for entry in entries.flatten() {
                let path = entry.path();
                if !path.is_file() || !is_managed_audio(&path) {
                    continue;
                }

                let modified = match entry.metadata().and_then(|m| m.modified()) {
                    Ok(modified) => modified,
                    Err(e) => {
                        debug!("No modification time for {}: {}", path.display(), e);
                        continue;
                    }
                };

                // mtime in the future: not expired
                let Ok(age) = now.duration_since(modified) else {
                    continue;
                };

                if age > self.max_age {
                    match std::fs::remove_file(&path) {
                        Ok(()) => {
                            debug!("Swept {} (age {}s)", path.display(), age.as_secs());
                            removed += 1;
                        }
                        Err(e) => debug!("Could not sweep {}: {}", path.display(), e),
                    }
                }
            }
        }

        removed
    }

    /// Run the sweep every `interval` until `shutdown` flips to true or its
    /// sender is dropped.
    pub fn spawn(self, interval: Duration, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // the first tick completes immediately; startup already swept
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let sweeper = self.clone();
                        match tokio::task::spawn_blocking(move || sweeper.sweep()).await {
                            Ok(0) => {}
                            Ok(removed) => info!("Retention sweep removed {} file(s)", removed),
                            Err(e) => warn!("Retention sweep task failed: {}", e),
                        }
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            debug!("Retention sweeper stopping");
                            break;
                        }
                    }
                }
            }
        })
    }
}
