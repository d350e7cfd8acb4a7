//! Core domain types.
//!
//! Everything that crosses a module or process boundary lives here with a
//! serde derive, so external payloads are decoded exactly once into named
//! shapes.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Artist
// ---------------------------------------------------------------------------

/// One artist node in the collaboration graph.
///
/// `id` is a stable external identifier (an MBID in practice) — opaque,
/// globally unique, and the only thing the search engine keys on. Immutable
/// once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
}

impl Artist {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// TrackEvidence
// ---------------------------------------------------------------------------

/// One recording that proves a collaboration between two artists.
///
/// Optional fields are empty strings rather than `Option`s: the equivalence
/// cascade treats empty as "absent", and upstream data sources deliver
/// blanks, not nulls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackEvidence {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub recording_id: String,
    #[serde(default)]
    pub recording_name: String,
    #[serde(default)]
    pub cover_url: String,
}

impl TrackEvidence {
    pub fn new(name: impl Into<String>, id: impl Into<String>, cover_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            recording_id: String::new(),
            recording_name: String::new(),
            cover_url: cover_url.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// NeighborEdge
// ---------------------------------------------------------------------------

/// Kind of relation backing an edge. Currently only track collaborations
/// exist, but the tag travels with every edge so other relation sources can
/// be added without reshaping the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkKind {
    TrackCollaboration,
}

impl LinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TrackCollaboration => "track-collaboration",
        }
    }
}

/// A directed edge produced by the neighbor resolver: the neighboring
/// artist plus the ordered track evidence backing the collaboration.
///
/// Transient — edges exist to feed the search frontier and the final hop
/// report; they are never persisted as entities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeighborEdge {
    pub artist: Artist,
    pub tracks: Vec<TrackEvidence>,
    pub link: LinkKind,
}

// ---------------------------------------------------------------------------
// EdgeKey
// ---------------------------------------------------------------------------

/// Composite key for per-edge bookkeeping: the ordered (parent, child)
/// artist id pair. An explicit pair type — not a concatenated string — so
/// there is no delimiter to collide with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeKey {
    pub parent: String,
    pub child: String,
}

impl EdgeKey {
    pub fn new(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            child: child.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Hop
// ---------------------------------------------------------------------------

/// One edge of the final path, with the deduplicated evidence that proves
/// it. Created only during path reconstruction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hop {
    pub from: Artist,
    pub to: Artist,
    pub tracks: Vec<TrackEvidence>,
}

// ---------------------------------------------------------------------------
// SearchStatus
// ---------------------------------------------------------------------------

/// Terminal status of one search, carried with HTTP-style codes because the
/// downstream job/status surface speaks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u16")]
pub enum SearchStatus {
    Found,
    InvalidInput,
    NotFound,
    RateLimited,
    Cancelled,
    TimedOut,
}

impl SearchStatus {
    pub fn code(&self) -> u16 {
        match self {
            Self::Found => 200,
            Self::InvalidInput => 400,
            Self::NotFound => 404,
            Self::RateLimited => 429,
            Self::Cancelled => 499,
            Self::TimedOut => 504,
        }
    }

    /// Whether this status represents a successfully reconstructed path.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found)
    }
}

impl From<SearchStatus> for u16 {
    fn from(s: SearchStatus) -> u16 {
        s.code()
    }
}

// ---------------------------------------------------------------------------
// SearchResult
// ---------------------------------------------------------------------------

/// Terminal value of one search invocation. Immutable once produced.
///
/// Invariants: `hops == path.len()`; `path[i].to.id == path[i + 1].from.id`;
/// the first hop starts at `start.id`; no artist id repeats as a `to`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub start: Artist,
    pub target: Artist,
    pub hops: usize,
    pub path: Vec<Hop>,
    pub status: SearchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SearchResult {
    /// A terminal result with no path (not-found, rate-limited, timed out…).
    pub fn empty(start: Artist, target: Artist, status: SearchStatus, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            start,
            target,
            hops: 0,
            path: Vec::new(),
            status,
            message: if message.is_empty() { None } else { Some(message) },
        }
    }

    /// A successful result; `hops` is derived from the path.
    pub fn found(start: Artist, target: Artist, path: Vec<Hop>) -> Self {
        Self {
            start,
            target,
            hops: path.len(),
            path,
            status: SearchStatus::Found,
            message: None,
        }
    }
}

// ---------------------------------------------------------------------------
// SearchRequest
// ---------------------------------------------------------------------------

/// Inbound request shape accepted by the job registry: artist names plus a
/// depth bound (0 = unbounded).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub start: String,
    pub target: String,
    #[serde(default)]
    pub depth: u32,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
