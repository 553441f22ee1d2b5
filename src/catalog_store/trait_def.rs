//! CatalogStore trait definition.
//!
//! Abstracts the track catalog so the server can run against the SQLite
//! store in production and lightweight fixtures in tests.

use anyhow::Result;

use super::models::Track;

/// Affect-space filter applied by the store when listing tracks.
///
/// Only playable (`working`) tracks are ever returned. The store itself does
/// not deduplicate ids; that happens at the query-engine boundary.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackFilter {
    /// Minimum valence, inclusive.
    pub valence_min: f64,
    /// Maximum arousal, inclusive.
    pub arousal_max: f64,
    /// When non-empty, restrict to tracks whose camelot key is in this set.
    pub camelot_allow: Vec<String>,
    /// Maximum number of rows to return.
    pub limit: usize,
}

/// Trait for catalog storage backends.
pub trait CatalogStore: Send + Sync {
    /// Get a track by ID.
    fn get_track(&self, id: &str) -> Result<Option<Track>>;

    /// List playable tracks matching the filter, in storage order.
    fn query_tracks(&self, filter: &TrackFilter) -> Result<Vec<Track>>;

    /// Number of tracks in the catalog.
    fn get_tracks_count(&self) -> usize;
}
