//! SQLite-backed catalog store implementation.

use super::models::{AudioStatus, Track};
use super::schema::migrate_if_needed;
use super::trait_def::{CatalogStore, TrackFilter};
use anyhow::{Context, Result};
use rusqlite::types::Value;
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

const TRACK_COLUMNS: &str =
    "id, title, file_path, storage_key, valence, arousal, dominance, bpm, camelot_key, audio_status";

/// SQLite-backed track catalog.
///
/// Reads go through a small pool of connections dispatched round-robin so
/// concurrent requests do not serialize on a single handle; writes share one
/// connection.
#[derive(Clone)]
pub struct SqliteCatalogStore {
    read_pool: Vec<Arc<Mutex<Connection>>>,
    write_conn: Arc<Mutex<Connection>>,
    read_index: Arc<AtomicUsize>,
}

fn track_from_row(row: &Row) -> rusqlite::Result<Track> {
    let audio_status: String = row.get(9)?;
    Ok(Track {
        id: row.get(0)?,
        title: row.get(1)?,
        file_path: row.get(2)?,
        storage_key: row.get(3)?,
        valence: row.get(4)?,
        arousal: row.get(5)?,
        dominance: row.get(6)?,
        bpm: row.get(7)?,
        camelot_key: row.get(8)?,
        audio_status: AudioStatus::from_db_str(&audio_status),
    })
}

impl SqliteCatalogStore {
    /// Open (creating if necessary) the catalog database at `db_path`.
    pub fn new<P: AsRef<Path>>(db_path: P, read_pool_size: usize) -> Result<Self> {
        let db_path = db_path.as_ref();

        let write_conn = Connection::open_with_flags(
            db_path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .context("Failed to open catalog database")?;

        migrate_if_needed(&write_conn)?;
        write_conn.pragma_update(None, "journal_mode", "WAL")?;

        let track_count: i64 = write_conn
            .query_row("SELECT COUNT(*) FROM tracks", [], |r| r.get(0))
            .unwrap_or(0);
        info!("Opened track catalog: {} tracks", track_count);

        let mut read_pool = Vec::with_capacity(read_pool_size.max(1));
        for _ in 0..read_pool_size.max(1) {
            let conn = Connection::open_with_flags(
                db_path,
                rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY
                    | rusqlite::OpenFlags::SQLITE_OPEN_URI
                    | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
            .context("Failed to open catalog read connection")?;
            read_pool.push(Arc::new(Mutex::new(conn)));
        }

        Ok(Self {
            read_pool,
            write_conn: Arc::new(Mutex::new(write_conn)),
            read_index: Arc::new(AtomicUsize::new(0)),
        })
    }

    fn read_conn(&self) -> Arc<Mutex<Connection>> {
        let index = self.read_index.fetch_add(1, Ordering::Relaxed) % self.read_pool.len();
        self.read_pool[index].clone()
    }

    /// Insert a track row. Does not enforce id uniqueness; duplicate ids are
    /// collapsed by the query engine's dedup pass.
    pub fn insert_track(&self, track: &Track) -> Result<()> {
        let conn = self.write_conn.lock().unwrap();
        conn.execute(
            &format!("INSERT INTO tracks ({TRACK_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"),
            params![
                track.id,
                track.title,
                track.file_path,
                track.storage_key,
                track.valence,
                track.arousal,
                track.dominance,
                track.bpm,
                track.camelot_key,
                track.audio_status.to_db_str(),
            ],
        )
        .context("Failed to insert track")?;
        Ok(())
    }
}

impl CatalogStore for SqliteCatalogStore {
    fn get_track(&self, id: &str) -> Result<Option<Track>> {
        let conn = self.read_conn();
        let locked = conn.lock().unwrap();
        let mut stmt = locked.prepare(&format!(
            "SELECT {TRACK_COLUMNS} FROM tracks WHERE id = ?1 ORDER BY rowid LIMIT 1"
        ))?;
        let mut rows = stmt.query_map(params![id], track_from_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    fn query_tracks(&self, filter: &TrackFilter) -> Result<Vec<Track>> {
        let mut sql = format!(
            "SELECT {TRACK_COLUMNS} FROM tracks \
             WHERE audio_status = ? AND valence >= ? AND arousal <= ?"
        );
        let mut values: Vec<Value> = vec![
            Value::from(AudioStatus::Working.to_db_str().to_string()),
            Value::from(filter.valence_min),
            Value::from(filter.arousal_max),
        ];

        if !filter.camelot_allow.is_empty() {
            let placeholders = vec!["?"; filter.camelot_allow.len()].join(", ");
            sql.push_str(&format!(" AND camelot_key IN ({placeholders})"));
            for key in &filter.camelot_allow {
                values.push(Value::from(key.clone()));
            }
        }

        sql.push_str(" ORDER BY rowid LIMIT ?");
        values.push(Value::from(filter.limit as i64));

        let conn = self.read_conn();
        let locked = conn.lock().unwrap();
        let mut stmt = locked.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(values), track_from_row)?;

        let mut tracks = Vec::new();
        for row in rows {
            tracks.push(row?);
        }
        Ok(tracks)
    }

    fn get_tracks_count(&self) -> usize {
        let conn = self.read_conn();
        let locked = conn.lock().unwrap();
        locked
            .query_row("SELECT COUNT(*) FROM tracks", [], |r| r.get::<_, i64>(0))
            .unwrap_or(0) as usize
    }
}
