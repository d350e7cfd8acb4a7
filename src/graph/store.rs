//! SQLite-backed store for artists and collaboration rows.
//!
//! All statements go through `prepare_cached`, so repeated calls during a
//! search reuse compiled statements.

use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::db::initialize_database;
use crate::error::Result;
use crate::types::Artist;

// ---------------------------------------------------------------------------
// SQL
// ---------------------------------------------------------------------------

const UPSERT_ARTIST: &str = "\
INSERT INTO artists (mbid, name) VALUES (?1, ?2)
ON CONFLICT (mbid) DO UPDATE SET name = excluded.name";

const SELECT_ARTIST_BY_ID: &str = "SELECT mbid, name FROM artists WHERE mbid = ?1";

// Lowest rowid wins so repeated lookups of an ambiguous name stay stable.
const SELECT_ARTIST_BY_NAME: &str = "\
SELECT mbid, name FROM artists
WHERE name = ?1 COLLATE NOCASE
ORDER BY rowid ASC
LIMIT 1";

const INSERT_COLLAB_ROW: &str = "\
INSERT OR IGNORE INTO collab_tracks
    (artist_mbid, neighbor_mbid, neighbor_name, recording_mbid, recording_name,
     track_mbid, track_name, release_mbid)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

const SELECT_COLLAB_ROWS: &str = "\
SELECT neighbor_mbid, neighbor_name, recording_mbid, recording_name,
       track_mbid, track_name, release_mbid
FROM collab_tracks
WHERE artist_mbid = ?1
ORDER BY rowid ASC
LIMIT ?2";

const COUNT_ARTISTS: &str = "SELECT count(*) FROM artists";
const COUNT_COLLAB_ROWS: &str = "SELECT count(*) FROM collab_tracks";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One track observation linking two artists.
#[derive(Debug, Clone, Default)]
pub struct CollabTrack {
    pub recording_mbid: String,
    pub recording_name: String,
    pub track_mbid: String,
    pub track_name: String,
    pub release_mbid: String,
}

/// Raw collaboration row as stored, before grouping into edges.
#[derive(Debug, Clone)]
pub struct CollabRow {
    pub neighbor_mbid: String,
    pub neighbor_name: String,
    pub track: CollabTrack,
}

/// Coarse table counts for status reporting.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StoreStats {
    pub artists: u64,
    pub collaboration_rows: u64,
}

// ---------------------------------------------------------------------------
// CollabStore
// ---------------------------------------------------------------------------

/// Handle over one SQLite connection. Not `Sync`; each worker thread opens
/// its own store.
pub struct CollabStore {
    conn: Connection,
}

impl CollabStore {
    /// Open the database at `path`, creating the schema if needed.
    pub fn open(path: &str) -> Result<Self> {
        Ok(Self {
            conn: initialize_database(path)?,
        })
    }

    /// Fresh in-memory store, used by tests.
    pub fn in_memory() -> Result<Self> {
        Self::open(":memory:")
    }

    /// Insert or rename an artist.
    pub fn upsert_artist(&self, artist: &Artist) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(UPSERT_ARTIST)?;
        stmt.execute(params![artist.id, artist.name])?;
        Ok(())
    }

    pub fn artist_by_id(&self, mbid: &str) -> Result<Option<Artist>> {
        let mut stmt = self.conn.prepare_cached(SELECT_ARTIST_BY_ID)?;
        let artist = stmt
            .query_row(params![mbid], |row| {
                Ok(Artist {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })
            .optional()?;
        Ok(artist)
    }

    /// Case-insensitive name lookup.
    pub fn artist_by_name(&self, name: &str) -> Result<Option<Artist>> {
        let mut stmt = self.conn.prepare_cached(SELECT_ARTIST_BY_NAME)?;
        let artist = stmt
            .query_row(params![name], |row| {
                Ok(Artist {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })
            .optional()?;
        Ok(artist)
    }

    /// Record one collaboration track between `a` and `b`.
    ///
    /// Writes both orientations and upserts both artist rows, so a later
    /// search can start from either side. Duplicate observations are ignored
    /// via the composite primary key.
    pub fn record_collaboration(&self, a: &Artist, b: &Artist, track: &CollabTrack) -> Result<()> {
        self.upsert_artist(a)?;
        self.upsert_artist(b)?;

        let mut stmt = self.conn.prepare_cached(INSERT_COLLAB_ROW)?;
        stmt.execute(params![
            a.id,
            b.id,
            b.name,
            track.recording_mbid,
            track.recording_name,
            track.track_mbid,
            track.track_name,
            track.release_mbid,
        ])?;
        stmt.execute(params![
            b.id,
            a.id,
            a.name,
            track.recording_mbid,
            track.recording_name,
            track.track_mbid,
            track.track_name,
            track.release_mbid,
        ])?;
        Ok(())
    }

    /// Fetch up to `limit` raw collaboration rows for one artist, in
    /// insertion order.
    pub fn collab_rows(&self, artist_mbid: &str, limit: usize) -> Result<Vec<CollabRow>> {
        let mut stmt = self.conn.prepare_cached(SELECT_COLLAB_ROWS)?;
        let rows = stmt.query_map(params![artist_mbid, limit as i64], |row| {
            Ok(CollabRow {
                neighbor_mbid: row.get(0)?,
                neighbor_name: row.get(1)?,
                track: CollabTrack {
                    recording_mbid: row.get(2)?,
                    recording_name: row.get(3)?,
                    track_mbid: row.get(4)?,
                    track_name: row.get(5)?,
                    release_mbid: row.get(6)?,
                },
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn stats(&self) -> Result<StoreStats> {
        let artists: i64 = self.conn.query_row(COUNT_ARTISTS, [], |r| r.get(0))?;
        let rows: i64 = self.conn.query_row(COUNT_COLLAB_ROWS, [], |r| r.get(0))?;
        Ok(StoreStats {
            artists: artists as u64,
            collaboration_rows: rows as u64,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
