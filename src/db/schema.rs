//! Schema DDL and connection bootstrap.
//!
//! Two tables. `artists` is the node set. `collab_tracks` is a flat tuple
//! table holding one row per (artist, neighbor, track) observation; it is
//! written symmetrically, so neighbor expansion is a single indexed scan on
//! `artist_mbid` with no direction handling.

use rusqlite::Connection;

use crate::error::Result;

const CREATE_ARTISTS: &str = "\
CREATE TABLE IF NOT EXISTS artists (
    mbid TEXT PRIMARY KEY,
    name TEXT NOT NULL
)";

const CREATE_COLLAB_TRACKS: &str = "\
CREATE TABLE IF NOT EXISTS collab_tracks (
    artist_mbid    TEXT NOT NULL,
    neighbor_mbid  TEXT NOT NULL,
    neighbor_name  TEXT NOT NULL,
    recording_mbid TEXT NOT NULL,
    recording_name TEXT NOT NULL,
    track_mbid     TEXT NOT NULL,
    track_name     TEXT NOT NULL,
    release_mbid   TEXT NOT NULL DEFAULT '',
    PRIMARY KEY (artist_mbid, neighbor_mbid, track_mbid)
)";

const CREATE_INDEXES: &str = "\
CREATE INDEX IF NOT EXISTS idx_collab_artist ON collab_tracks (artist_mbid);
CREATE INDEX IF NOT EXISTS idx_collab_neighbor ON collab_tracks (neighbor_mbid);
CREATE INDEX IF NOT EXISTS idx_artists_name ON artists (name COLLATE NOCASE);";

/// Open (or create) the database at `path` and ensure the schema exists.
///
/// `:memory:` is accepted and used throughout the test suite.
pub fn initialize_database(path: &str) -> Result<Connection> {
    let conn = Connection::open(path)?;

    // WAL lets a long-running search read while an import writes.
    // In-memory databases silently ignore it.
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;

    conn.execute(CREATE_ARTISTS, [])?;
    conn.execute(CREATE_COLLAB_TRACKS, [])?;
    conn.execute_batch(CREATE_INDEXES)?;

    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_creates_schema_in_memory() {
        let conn = initialize_database(":memory:").unwrap();
        let n: i64 = conn
            .query_row("SELECT count(*) FROM artists", [], |r| r.get(0))
            .unwrap();
        assert_eq!(n, 0);
        let n: i64 = conn
            .query_row("SELECT count(*) FROM collab_tracks", [], |r| r.get(0))
            .unwrap();
        assert_eq!(n, 0);
    }

    #[test]
    fn initialize_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.db");
        let path = path.to_str().unwrap();

        {
            let conn = initialize_database(path).unwrap();
            conn.execute(
                "INSERT INTO artists (mbid, name) VALUES ('a1', 'Alpha')",
                [],
            )
            .unwrap();
        }

        let conn = initialize_database(path).unwrap();
        let n: i64 = conn
            .query_row("SELECT count(*) FROM artists", [], |r| r.get(0))
            .unwrap();
        assert_eq!(n, 1);
    }

    #[test]
    fn duplicate_collab_rows_are_rejected_by_primary_key() {
        let conn = initialize_database(":memory:").unwrap();
        let insert = "INSERT INTO collab_tracks \
            (artist_mbid, neighbor_mbid, neighbor_name, recording_mbid, recording_name, track_mbid, track_name, release_mbid) \
            VALUES ('a', 'b', 'B', 'r', 'R', 't', 'T', '')";
        conn.execute(insert, []).unwrap();
        assert!(conn.execute(insert, []).is_err());
    }
}
