//! Track search and lookup routes.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::query::{self, Bounds, Goal, SearchRequest, TrackDescriptor};

use super::state::{GuardedCatalogStore, ServerState};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub goal: Option<String>,
    pub valence_min: Option<f64>,
    pub arousal_max: Option<f64>,
    pub dominance_min: Option<f64>,
    /// Canonical wire form: comma-separated key list ("8A,9A").
    pub camelot_allow: Option<String>,
    pub limit: Option<usize>,
}

/// GET /api/tracks/search
pub async fn search_tracks(
    State(state): State<ServerState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<TrackDescriptor>>, ApiError> {
    if params.limit == Some(0) {
        return Err(ApiError::BadRequest("limit must be positive".into()));
    }

    let request = SearchRequest {
        goal: Goal::parse(params.goal.as_deref().unwrap_or("")),
        bounds: Bounds::from_client(
            params.valence_min,
            params.arousal_max,
            params.dominance_min,
        ),
        camelot_allow: params
            .camelot_allow
            .as_deref()
            .map(query::parse_camelot_allow)
            .unwrap_or_default(),
        limit: params.limit,
    };

    let descriptors = query::run_search(
        state.catalog_store.as_ref(),
        &request,
        state.config.max_search_limit,
    )
    .map_err(|e| ApiError::QueryFailed(e.to_string()))?;

    Ok(Json(descriptors))
}

/// GET /api/tracks/{id}
pub async fn get_track(
    State(catalog_store): State<GuardedCatalogStore>,
    Path(id): Path<String>,
) -> Result<Json<TrackDescriptor>, ApiError> {
    let track = catalog_store
        .get_track(&id)
        .map_err(|e| ApiError::QueryFailed(e.to_string()))?
        .ok_or(ApiError::NotFound)?;
    if !track.audio_status.is_playable() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(TrackDescriptor::from(track)))
}
