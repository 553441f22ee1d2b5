//! Catalog models for the SQLite-backed track store.

use serde::{Deserialize, Serialize};

/// Playability state of a track's audio object.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioStatus {
    Working,
    Bad,
    Unknown,
    Missing,
}

impl AudioStatus {
    /// Convert from database string representation.
    pub fn from_db_str(s: &str) -> Self {
        match s {
            "working" => AudioStatus::Working,
            "bad" => AudioStatus::Bad,
            "missing" => AudioStatus::Missing,
            _ => AudioStatus::Unknown,
        }
    }

    /// Convert to database string representation.
    pub fn to_db_str(&self) -> &'static str {
        match self {
            AudioStatus::Working => "working",
            AudioStatus::Bad => "bad",
            AudioStatus::Unknown => "unknown",
            AudioStatus::Missing => "missing",
        }
    }

    /// Only `working` tracks are eligible for playback and search results.
    pub fn is_playable(&self) -> bool {
        matches!(self, AudioStatus::Working)
    }
}

impl Default for AudioStatus {
    fn default() -> Self {
        AudioStatus::Working
    }
}

/// A catalog row. Affect components stay optional here; defaults are applied
/// at the wire-format boundary, never in storage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub file_path: Option<String>,
    pub storage_key: Option<String>,
    pub valence: Option<f64>,
    pub arousal: Option<f64>,
    pub dominance: Option<f64>,
    pub bpm: Option<f64>,
    pub camelot_key: Option<String>,
    pub audio_status: AudioStatus,
}

impl Track {
    /// The track's storage coordinate: `file_path` falling back to
    /// `storage_key`. Empty strings count as absent.
    pub fn location(&self) -> Option<&str> {
        self.file_path
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.storage_key.as_deref().filter(|s| !s.is_empty()))
    }
}
