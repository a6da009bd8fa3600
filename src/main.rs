mod asr;
mod config_manager;
mod error;
mod handlers;
mod languages;
mod pipeline;
mod routes;
mod state;
mod sweeper;
mod temp_files;
mod translate;
mod tts;
mod utils;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config_manager::Config;
use state::AppState;
use sweeper::RetentionSweeper;

fn load_config() -> Result<Config> {
    // Get the executable directory to resolve relative paths correctly
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| std::path::PathBuf::from("."));

    let config_paths: Vec<String> = vec![
        std::env::var("CONFIG_PATH").ok(),
        Some("conf.yaml".to_string()),
        Some("conf.json".to_string()),
        exe_dir.join("conf.yaml").to_str().map(|s| s.to_string()),
    ]
    .into_iter()
    .flatten()
    .collect();

    for path in &config_paths {
        if !std::path::Path::new(path).exists() {
            tracing::debug!("No config at {}", path);
            continue;
        }
        // A file that exists but does not parse is fatal
        let config = Config::load(path)?;
        info!("Loaded configuration from: {}", path);
        return Ok(config);
    }

    warn!("No config file found (tried {:?}), using defaults", config_paths);
    Ok(Config::default())
}

async fn shutdown_signal(shutdown: watch::Sender<bool>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Could not listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
    let _ = shutdown.send(true);
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("voice_translator=debug,tower_http=debug")),
        )
        .init();

    let config = load_config()?;

    let app_state = AppState::new(config.clone())?;
    app_state.store.ensure_dirs()?;
    info!("Initialized directories");

    // Clean old files on startup, then keep sweeping in the background
    let system_config = &config.system_config;
    let sweeper = RetentionSweeper::new(app_state.store.directories(), system_config.retention());
    let removed = sweeper.sweep();
    info!("Startup cleanup removed {} file(s)", removed);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper_task = sweeper.spawn(system_config.sweep_interval(), shutdown_rx);

    info!("Languages: {}", app_state.catalog.codes().join(", "));
    info!("Transcription: {}", config.asr_config.base_url);
    info!("Translation: {}", config.translate_config.base_url);
    info!("TTS engine: {}", config.tts_config.tts_model);

    let app = routes::build_app(app_state);

    let listener =
        tokio::net::TcpListener::bind((system_config.host.as_str(), system_config.port)).await?;
    info!("Starting server on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await?;

    if let Err(e) = sweeper_task.await {
        warn!("Retention sweeper ended abnormally: {}", e);
    }

    Ok(())
}
