//! Test fixture creation: a populated catalog database plus audio files.

use super::constants::*;
use anyhow::Result;
use calmstream_server::catalog_store::{AudioStatus, SqliteCatalogStore, Track};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Deterministic audio payload, distinct per seed.
pub fn test_audio_bytes(seed: u8) -> Vec<u8> {
    (0..TEST_AUDIO_SIZE_BYTES)
        .map(|i| ((i as u64 * 7 + seed as u64) % 251) as u8)
        .collect()
}

fn make_track(
    id: &str,
    title: &str,
    file_path: &str,
    valence: f64,
    arousal: f64,
    camelot: &str,
    audio_status: AudioStatus,
) -> Track {
    Track {
        id: id.to_string(),
        title: title.to_string(),
        file_path: Some(file_path.to_string()),
        storage_key: None,
        valence: Some(valence),
        arousal: Some(arousal),
        dominance: Some(0.4),
        bpm: Some(96.0),
        camelot_key: Some(camelot.to_string()),
        audio_status,
    }
}

/// Creates a temporary catalog database and audio root.
///
/// Row order matters: the duplicate-id rows come first so they land inside
/// the capped result window of search queries.
pub fn create_test_catalog() -> Result<(TempDir, PathBuf, PathBuf)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("catalog.db");
    let audio_root = temp_dir.path().join("media");
    fs::create_dir_all(audio_root.join("tracks"))?;

    let store = SqliteCatalogStore::new(&db_path, 1)?;

    // Two rows sharing one id; high valence but arousal above every goal
    // ceiling, so only unfiltered queries see it.
    let dup = make_track(
        TRACK_DUP_ID,
        "Doubled Entry",
        "tracks/dup.mp3",
        0.9,
        0.6,
        "10A",
        AudioStatus::Working,
    );
    store.insert_track(&dup)?;
    store.insert_track(&dup)?;

    let calm = [
        (TRACK_CALM_1_ID, "Slow Tide", "tracks/calm-1.mp3", 0.30),
        (TRACK_CALM_2_ID, "Evening Glass", "tracks/calm-2.mp3", 0.20),
        (TRACK_CALM_3_ID, "Low Lantern", "tracks/calm-3.mp3", 0.35),
    ];
    for (i, (id, title, path, arousal)) in calm.iter().enumerate() {
        store.insert_track(&make_track(
            id,
            title,
            path,
            0.9,
            *arousal,
            CALM_CAMELOT_KEYS[i],
            AudioStatus::Working,
        ))?;
    }

    let tense = [
        (TRACK_TENSE_1_ID, "Rush Hour", "tracks/tense-1.mp3", 0.80, "5B"),
        (TRACK_TENSE_2_ID, "Static Drift", "tracks/tense-2.mp3", 0.90, "12B"),
    ];
    for (id, title, path, arousal, camelot) in tense {
        store.insert_track(&make_track(
            id,
            title,
            path,
            0.3,
            arousal,
            camelot,
            AudioStatus::Working,
        ))?;
    }

    store.insert_track(&make_track(
        TRACK_GHOST_ID,
        "Ghost File",
        "tracks/ghost.mp3",
        0.3,
        0.9,
        "3B",
        AudioStatus::Working,
    ))?;
    store.insert_track(&make_track(
        TRACK_BROKEN_ID,
        "Broken Upload",
        "tracks/broken.mp3",
        0.9,
        0.2,
        "8A",
        AudioStatus::Bad,
    ))?;

    // Audio files for everything except the ghost track.
    let files = [
        ("tracks/dup.mp3", 0u8),
        ("tracks/calm-1.mp3", 1),
        ("tracks/calm-2.mp3", 2),
        ("tracks/calm-3.mp3", 3),
        ("tracks/tense-1.mp3", 4),
        ("tracks/tense-2.mp3", 5),
        ("tracks/broken.mp3", 6),
    ];
    for (path, seed) in files {
        fs::write(audio_root.join(path), test_audio_bytes(seed))?;
    }

    Ok((temp_dir, db_path, audio_root))
}
