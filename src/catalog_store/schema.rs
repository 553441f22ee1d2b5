//! SQLite schema for the track catalog database.
//!
//! The `id` column is indexed but deliberately not unique: id uniqueness is
//! enforced at the query boundary by the dedup pass, not assumed from
//! storage, so multi-source imports cannot poison playback.

use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// Schema version written to `PRAGMA user_version`.
pub const CATALOG_SCHEMA_VERSION: i64 = 1;

const CREATE_TRACKS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS tracks (
    rowid INTEGER PRIMARY KEY,
    id TEXT NOT NULL,
    title TEXT NOT NULL,
    file_path TEXT,
    storage_key TEXT,
    valence REAL,
    arousal REAL,
    dominance REAL,
    bpm REAL,
    camelot_key TEXT,
    audio_status TEXT NOT NULL DEFAULT 'working'
);
CREATE INDEX IF NOT EXISTS idx_tracks_id ON tracks (id);
CREATE INDEX IF NOT EXISTS idx_tracks_status_valence ON tracks (audio_status, valence);
CREATE INDEX IF NOT EXISTS idx_tracks_camelot ON tracks (camelot_key);
";

/// Create or migrate the catalog schema in place.
pub fn migrate_if_needed(conn: &Connection) -> Result<()> {
    let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;

    if db_version >= CATALOG_SCHEMA_VERSION {
        return Ok(());
    }

    if db_version == 0 {
        info!(
            "Creating catalog db schema at version {}",
            CATALOG_SCHEMA_VERSION
        );
        conn.execute_batch(CREATE_TRACKS_TABLE)?;
    }

    conn.pragma_update(None, "user_version", CATALOG_SCHEMA_VERSION)?;
    Ok(())
}
