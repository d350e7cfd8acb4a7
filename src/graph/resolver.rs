//! Lazy neighbor resolution.
//!
//! The search engine never touches SQL directly; it asks a
//! [`NeighborResolver`] for the edges of one artist at a time. The store
//! implementation groups raw collaboration rows into per-neighbor edges.
//! Tests substitute scripted resolvers.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use crate::config::MAX_NEIGHBOR_LIMIT;
use crate::dedupe::{dedupe_tracks, DEFAULT_DEDUPE_THRESHOLD};
use crate::graph::store::CollabStore;
use crate::types::{Artist, LinkKind, NeighborEdge, TrackEvidence};

/// Rows fetched when a caller passes limit 0.
pub const RESOLVER_DEFAULT_LIMIT: usize = 200;

const COVER_ART_BASE: &str = "https://coverartarchive.org/release";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure modes of one neighbor resolution.
///
/// `RateLimited` is special: the search engine aborts the whole search on
/// it, while any other variant only skips the node being expanded.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("artist is missing a usable identifier")]
    MissingId,
    #[error("upstream rate limit reached")]
    RateLimited,
    #[error("backing store failure: {0}")]
    Backend(String),
}

impl ResolveError {
    /// HTTP-style code carried to the job/status surface.
    pub fn status(&self) -> u16 {
        match self {
            Self::MissingId => 400,
            Self::RateLimited => 429,
            Self::Backend(_) => 500,
        }
    }
}

impl From<rusqlite::Error> for ResolveError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Backend(e.to_string())
    }
}

impl From<crate::error::Error> for ResolveError {
    fn from(e: crate::error::Error) -> Self {
        Self::Backend(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Source of outgoing edges for one artist.
pub trait NeighborResolver {
    /// Resolve up to `limit` collaboration rows' worth of neighbors.
    /// `limit == 0` selects [`RESOLVER_DEFAULT_LIMIT`]; anything above
    /// [`MAX_NEIGHBOR_LIMIT`] is clamped.
    fn resolve(&self, artist: &Artist, limit: usize) -> Result<Vec<NeighborEdge>, ResolveError>;
}

/// Apply the default-and-clamp rule for a caller-supplied row limit.
pub fn clamp_limit(limit: usize) -> usize {
    if limit == 0 {
        RESOLVER_DEFAULT_LIMIT
    } else {
        limit.min(MAX_NEIGHBOR_LIMIT)
    }
}

/// Cover Art Archive front-cover URL for a release, or empty when the
/// release is unknown.
pub fn cover_art_url(release_mbid: &str) -> String {
    if release_mbid.is_empty() {
        String::new()
    } else {
        format!("{COVER_ART_BASE}/{release_mbid}/front")
    }
}

// ---------------------------------------------------------------------------
// Store-backed implementation
// ---------------------------------------------------------------------------

/// Resolver reading pre-imported collaboration rows from [`CollabStore`].
pub struct StoreNeighborResolver<'a> {
    store: &'a CollabStore,
}

impl<'a> StoreNeighborResolver<'a> {
    pub fn new(store: &'a CollabStore) -> Self {
        Self { store }
    }
}

impl NeighborResolver for StoreNeighborResolver<'_> {
    fn resolve(&self, artist: &Artist, limit: usize) -> Result<Vec<NeighborEdge>, ResolveError> {
        if artist.id.is_empty() {
            return Err(ResolveError::MissingId);
        }

        let rows = self.store.collab_rows(&artist.id, clamp_limit(limit))?;

        // Group rows per neighbor, preserving first-seen neighbor order and
        // dropping repeat observations of the same track id.
        let mut edges: Vec<NeighborEdge> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut seen: HashMap<String, Vec<String>> = HashMap::new();

        for row in rows {
            if row.track.track_mbid.is_empty() {
                tracing::debug!(
                    artist = %artist.name,
                    neighbor = %row.neighbor_name,
                    "skipping collaboration row without a track id"
                );
                continue;
            }

            let seen_tracks = seen.entry(row.neighbor_mbid.clone()).or_default();
            if seen_tracks.contains(&row.track.track_mbid) {
                continue;
            }
            seen_tracks.push(row.track.track_mbid.clone());

            let evidence = TrackEvidence {
                id: row.track.track_mbid,
                name: row.track.track_name,
                recording_id: row.track.recording_mbid,
                recording_name: row.track.recording_name,
                cover_url: cover_art_url(&row.track.release_mbid),
            };

            match index.get(&row.neighbor_mbid) {
                Some(&i) => edges[i].tracks.push(evidence),
                None => {
                    index.insert(row.neighbor_mbid.clone(), edges.len());
                    edges.push(NeighborEdge {
                        artist: Artist::new(row.neighbor_mbid, row.neighbor_name),
                        tracks: vec![evidence],
                        link: LinkKind::TrackCollaboration,
                    });
                }
            }
        }

        Ok(edges)
    }
}

// ---------------------------------------------------------------------------
// Name-based lookup
// ---------------------------------------------------------------------------

/// One artist's deduplicated neighborhood, for direct inspection.
#[derive(Debug, Serialize)]
pub struct NeighborListing {
    pub artist: Artist,
    pub neighbors: Vec<NeighborEdge>,
}

/// Resolve an artist by name and list its neighbors with per-edge track
/// dedup applied. `Ok(None)` when the name is unknown.
pub fn lookup_neighbors(
    store: &CollabStore,
    name: &str,
    limit: usize,
) -> crate::error::Result<Option<NeighborListing>> {
    let Some(artist) = store.artist_by_name(name)? else {
        return Ok(None);
    };

    let resolver = StoreNeighborResolver::new(store);
    let mut neighbors = resolver
        .resolve(&artist, limit)
        .map_err(|e| crate::error::Error::InvalidInput(e.to_string()))?;

    for edge in &mut neighbors {
        edge.tracks = dedupe_tracks(std::mem::take(&mut edge.tracks), DEFAULT_DEDUPE_THRESHOLD);
    }

    Ok(Some(NeighborListing { artist, neighbors }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::store::CollabTrack;

    fn seeded_store() -> CollabStore {
        let s = CollabStore::in_memory().unwrap();
        let em = Artist::new("em", "Eminem");
        let ri = Artist::new("ri", "Rihanna");
        let dr = Artist::new("dr", "Dr. Dre");

        s.record_collaboration(
            &em,
            &ri,
            &CollabTrack {
                recording_mbid: "rec1".into(),
                recording_name: "Love The Way You Lie".into(),
                track_mbid: "t1".into(),
                track_name: "Love The Way You Lie".into(),
                release_mbid: "rel1".into(),
            },
        )
        .unwrap();
        s.record_collaboration(
            &em,
            &ri,
            &CollabTrack {
                recording_mbid: "rec2".into(),
                recording_name: "The Monster".into(),
                track_mbid: "t2".into(),
                track_name: "The Monster".into(),
                release_mbid: String::new(),
            },
        )
        .unwrap();
        s.record_collaboration(
            &em,
            &dr,
            &CollabTrack {
                recording_mbid: "rec3".into(),
                recording_name: "Forgot About Dre".into(),
                track_mbid: "t3".into(),
                track_name: "Forgot About Dre".into(),
                release_mbid: String::new(),
            },
        )
        .unwrap();
        s
    }

    #[test]
    fn resolve_groups_rows_per_neighbor() {
        let store = seeded_store();
        let resolver = StoreNeighborResolver::new(&store);
        let edges = resolver.resolve(&Artist::new("em", "Eminem"), 0).unwrap();

        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].artist.id, "ri");
        assert_eq!(edges[0].tracks.len(), 2);
        assert_eq!(edges[1].artist.id, "dr");
        assert_eq!(edges[1].tracks.len(), 1);
        assert_eq!(edges[0].link, LinkKind::TrackCollaboration);
    }

    #[test]
    fn resolve_builds_cover_urls_only_for_known_releases() {
        let store = seeded_store();
        let resolver = StoreNeighborResolver::new(&store);
        let edges = resolver.resolve(&Artist::new("em", "Eminem"), 0).unwrap();

        let tracks = &edges[0].tracks;
        assert_eq!(
            tracks[0].cover_url,
            "https://coverartarchive.org/release/rel1/front"
        );
        assert_eq!(tracks[1].cover_url, "");
    }

    #[test]
    fn resolve_rejects_missing_id() {
        let store = seeded_store();
        let resolver = StoreNeighborResolver::new(&store);
        let err = resolver.resolve(&Artist::new("", "Nobody"), 0).unwrap_err();
        assert!(matches!(err, ResolveError::MissingId));
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn resolve_unknown_artist_yields_no_edges() {
        let store = seeded_store();
        let resolver = StoreNeighborResolver::new(&store);
        let edges = resolver.resolve(&Artist::new("zz", "Ghost"), 0).unwrap();
        assert!(edges.is_empty());
    }

    #[test]
    fn limit_rules() {
        assert_eq!(clamp_limit(0), RESOLVER_DEFAULT_LIMIT);
        assert_eq!(clamp_limit(50), 50);
        assert_eq!(clamp_limit(1_000_000), MAX_NEIGHBOR_LIMIT);
    }

    #[test]
    fn lookup_neighbors_by_name_dedupes_tracks() {
        let store = seeded_store();
        let em = Artist::new("em", "Eminem");
        let ri = Artist::new("ri", "Rihanna");
        // A near-duplicate of t1 under another track id.
        store
            .record_collaboration(
                &em,
                &ri,
                &CollabTrack {
                    recording_mbid: "rec4".into(),
                    recording_name: "Love The Way You Lie".into(),
                    track_mbid: "t4".into(),
                    track_name: "Love the Way You Lie (Radio Edit)".into(),
                    release_mbid: String::new(),
                },
            )
            .unwrap();

        let listing = lookup_neighbors(&store, "eminem", 0).unwrap().unwrap();
        assert_eq!(listing.artist.id, "em");
        let rihanna = listing
            .neighbors
            .iter()
            .find(|e| e.artist.id == "ri")
            .unwrap();
        assert_eq!(rihanna.tracks.len(), 2); // t1+t4 merged, t2 separate
    }

    #[test]
    fn lookup_unknown_name_is_none() {
        let store = seeded_store();
        assert!(lookup_neighbors(&store, "nobody", 0).unwrap().is_none());
    }
}
