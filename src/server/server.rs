use anyhow::Result;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::catalog_store::CatalogStore;
use crate::storage::AudioBackend;

use super::cors::make_cors_layer;
use super::search::{get_track, search_tracks};
use super::state::ServerState;
use super::stream::{probe_audio, stream_audio};
use super::{log_requests, ServerConfig};

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    ts: String,
    stream_backend: String,
}

async fn health(State(state): State<ServerState>) -> impl IntoResponse {
    Json(HealthResponse {
        ok: true,
        ts: chrono::Utc::now().to_rfc3339(),
        stream_backend: state.audio_backend.name().to_string(),
    })
}

async fn api_fallback() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "ok": false, "error": "NotFound" })),
    )
}

pub fn make_app(
    config: ServerConfig,
    catalog_store: Arc<dyn CatalogStore>,
    audio_backend: Arc<dyn AudioBackend>,
) -> Router {
    let state = ServerState {
        config: config.clone(),
        catalog_store,
        audio_backend,
    };

    let api_routes: Router = Router::new()
        .route("/health", get(health))
        .route("/stream", get(stream_audio).head(probe_audio))
        .route("/tracks/search", get(search_tracks))
        .route("/tracks/{id}", get(get_track))
        .fallback(api_fallback)
        .with_state(state.clone());

    Router::new()
        .nest("/api", api_routes)
        .layer(make_cors_layer(&config.allowed_origins))
        .layer(middleware::from_fn_with_state(state, log_requests))
}

pub async fn run_server(
    config: ServerConfig,
    catalog_store: Arc<dyn CatalogStore>,
    audio_backend: Arc<dyn AudioBackend>,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, catalog_store, audio_backend);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    info!("Listening on 127.0.0.1:{}", port);

    Ok(axum::serve(listener, app).await?)
}
