//! Catalog query engine.
//!
//! Turns a `(goal, bounds, camelot allow-list, limit)` request into a
//! bounded, deduplicated, normalized list of playable track descriptors.
//! Goal-derived bounds are server-side truth and always win over looser
//! client-supplied bounds.

pub mod goals;

pub use goals::{Bounds, Goal};

use std::collections::HashSet;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::catalog_store::{AudioStatus, CatalogStore, Track, TrackFilter};

/// Wire default for tracks without a harmonic key.
pub const DEFAULT_CAMELOT_KEY: &str = "1A";

/// Wire default for absent affect components.
const DEFAULT_AFFECT: f64 = 0.5;

/// Normalized affect tuple as exposed on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vad {
    pub valence: f64,
    pub arousal: f64,
    pub dominance: f64,
}

/// Playable track descriptor returned by the search endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackDescriptor {
    pub unique_id: String,
    pub title: String,
    pub file_path: Option<String>,
    pub camelot_key: String,
    pub bpm: Option<f64>,
    pub vad: Vad,
    pub audio_status: AudioStatus,
}

impl From<Track> for TrackDescriptor {
    fn from(track: Track) -> Self {
        let file_path = track.location().map(str::to_string);
        TrackDescriptor {
            unique_id: track.id,
            title: track.title,
            file_path,
            camelot_key: track
                .camelot_key
                .filter(|k| !k.is_empty())
                .unwrap_or_else(|| DEFAULT_CAMELOT_KEY.to_string()),
            bpm: track.bpm,
            vad: Vad {
                valence: track.valence.unwrap_or(DEFAULT_AFFECT),
                arousal: track.arousal.unwrap_or(DEFAULT_AFFECT),
                dominance: track.dominance.unwrap_or(DEFAULT_AFFECT),
            },
            audio_status: track.audio_status,
        }
    }
}

/// A resolved search request, bounds already clamped to `[0,1]`.
#[derive(Clone, Debug)]
pub struct SearchRequest {
    pub goal: Goal,
    pub bounds: Bounds,
    pub camelot_allow: Vec<String>,
    pub limit: Option<usize>,
}

/// Parse the canonical comma-separated `camelot_allow` wire form.
/// Empty segments are ignored; an empty string yields no restriction.
pub fn parse_camelot_allow(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Stable first-seen dedup by track id, preserving input order.
pub fn dedup_by_id(tracks: Vec<Track>) -> Vec<Track> {
    let mut seen = HashSet::new();
    tracks
        .into_iter()
        .filter(|track| seen.insert(track.id.clone()))
        .collect()
}

/// Execute a search against the store: tighten bounds by goal, cap the
/// limit at the server maximum, query, dedup, normalize.
pub fn run_search(
    store: &dyn CatalogStore,
    request: &SearchRequest,
    max_limit: usize,
) -> Result<Vec<TrackDescriptor>> {
    let bounds = request.bounds.tightened(request.goal);
    let limit = request.limit.unwrap_or(max_limit).min(max_limit);

    let filter = TrackFilter {
        valence_min: bounds.valence_min,
        arousal_max: bounds.arousal_max,
        camelot_allow: request.camelot_allow.clone(),
        limit,
    };

    let tracks = store.query_tracks(&filter)?;
    Ok(dedup_by_id(tracks)
        .into_iter()
        .map(TrackDescriptor::from)
        .collect())
}
