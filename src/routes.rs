use axum::{
    extract::DefaultBodyLimit,
    handler::HandlerWithoutStateExt,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Outer cap on request bodies, as a multiple of the audio limit. Uploads
/// between the audio limit and this cap are read, truncated and validated.
const BODY_LIMIT_FACTOR: usize = 4;
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

fn body_limit(max_upload_bytes: usize) -> usize {
    max_upload_bytes
        .saturating_mul(BODY_LIMIT_FACTOR)
        .saturating_add(MULTIPART_OVERHEAD_BYTES)
}

pub fn create_routes(state: &AppState) -> Router<AppState> {
    let system_config = &state.config.system_config;
    let audio_files = ServeDir::new(system_config.output_path())
        .not_found_service(handlers::audio_not_found.into_service());

    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        .route("/languages", get(handlers::languages))
        .route("/translate", post(handlers::translate_audio))

        // Operator tooling
        .route("/test-translation", get(handlers::test_translation))
        .route("/debug-transcription", post(handlers::debug_transcription))

        // Synthesized audio
        .nest_service("/audio", audio_files)
        .layer(DefaultBodyLimit::max(body_limit(system_config.max_upload_bytes)))
}

/// Full application with tracing and CORS applied
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(create_routes(&state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
