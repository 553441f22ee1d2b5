//! Audio streaming proxy endpoints.
//!
//! Relays ranged audio bytes from the configured storage backend without
//! exposing the origin location. Track ids are re-resolved against the
//! catalog on every request; storage coordinates are never cached here.

use axum::extract::{FromRequestParts, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::debug;

use crate::catalog_store::CatalogStore;
use crate::error::ApiError;
use crate::storage::{AudioStream, ByteRange, ObjectInfo, ServedRange, StreamTarget};

use super::state::ServerState;

const HEADER_BYTE_RANGE: &str = "Range";

pub struct ByteRangeExtractionError {}

impl IntoResponse for ByteRangeExtractionError {
    fn into_response(self) -> Response {
        StatusCode::BAD_REQUEST.into_response()
    }
}

impl FromRequestParts<ServerState> for Option<ByteRange> {
    type Rejection = ByteRangeExtractionError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        Ok(parts
            .headers
            .get(HEADER_BYTE_RANGE)
            .map(|x| x.to_str())
            .map(|x| x.ok())
            .and_then(|x| x.and_then(ByteRange::parse)))
    }
}

#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    pub id: Option<String>,
    pub path: Option<String>,
    pub url: Option<String>,
}

/// Resolve the request to exactly one stream target.
///
/// `id` goes through the catalog; only playable tracks with a usable storage
/// coordinate resolve. Supplying more than one selector is rejected.
fn resolve_target(
    query: &StreamQuery,
    catalog_store: &dyn CatalogStore,
) -> Result<StreamTarget, ApiError> {
    let supplied = [
        query.id.is_some(),
        query.path.is_some(),
        query.url.is_some(),
    ]
    .iter()
    .filter(|x| **x)
    .count();
    if supplied > 1 {
        return Err(ApiError::BadRequest(
            "supply exactly one of id, path or url".into(),
        ));
    }

    if let Some(id) = &query.id {
        let track = catalog_store
            .get_track(id)
            .map_err(|e| ApiError::QueryFailed(e.to_string()))?
            .ok_or(ApiError::NotFound)?;
        if !track.audio_status.is_playable() {
            debug!("Track {} audio not playable", track.id);
            return Err(ApiError::NotFound);
        }
        let location = track.location().ok_or(ApiError::NotFound)?;
        return Ok(StreamTarget::classify(location));
    }
    if let Some(path) = &query.path {
        return Ok(StreamTarget::Key(path.clone()));
    }
    if let Some(url) = &query.url {
        return Ok(StreamTarget::Url(url.clone()));
    }
    Err(ApiError::BadRequest(
        "one of id, path or url is required".into(),
    ))
}

fn stream_response(stream: AudioStream) -> Response {
    let builder = Response::builder()
        .header(header::CONTENT_TYPE, stream.content_type)
        .header(header::ACCEPT_RANGES, "bytes");

    let builder = match stream.range {
        ServedRange::Full { total: None } => builder.status(StatusCode::OK),
        ServedRange::Full { total: Some(total) } => builder
            .status(StatusCode::OK)
            .header(header::CONTENT_LENGTH, total),
        ServedRange::Partial { start, end, total } => builder
            .status(StatusCode::PARTIAL_CONTENT)
            .header(
                header::CONTENT_RANGE,
                format!("bytes {start}-{end}/{total}"),
            )
            .header(header::CONTENT_LENGTH, end - start + 1),
    };

    builder.body(stream.body).unwrap()
}

fn probe_response(info: ObjectInfo) -> Response {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, info.content_type)
        .header(header::ACCEPT_RANGES, "bytes");
    if let Some(total) = info.total {
        builder = builder.header(header::CONTENT_LENGTH, total);
    }
    builder.body(axum::body::Body::empty()).unwrap()
}

/// GET /api/stream
pub async fn stream_audio(
    byte_range: Option<ByteRange>,
    State(state): State<ServerState>,
    Query(query): Query<StreamQuery>,
) -> Result<Response, ApiError> {
    let target = resolve_target(&query, state.catalog_store.as_ref())?;
    let stream = state.audio_backend.serve(&target, byte_range).await?;
    Ok(stream_response(stream))
}

/// HEAD /api/stream
pub async fn probe_audio(
    State(state): State<ServerState>,
    Query(query): Query<StreamQuery>,
) -> Result<Response, ApiError> {
    let target = resolve_target(&query, state.catalog_store.as_ref())?;
    let info = state.audio_backend.probe(&target).await?;
    Ok(probe_response(info))
}
