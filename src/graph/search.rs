//! Breadth-first path search over the lazily-resolved collaboration graph.
//!
//! The engine owns no graph data. It pulls edges from a
//! [`NeighborResolver`] one frontier node at a time, deduplicates each
//! edge's track evidence mid-flight, and stops the moment the target is
//! discovered, so the first completed path is shortest by construction.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde::Serialize;

use crate::config::SearchOptions;
use crate::dedupe::dedupe_tracks;
use crate::error::Result;
use crate::graph::reconstruct::reconstruct_path;
use crate::graph::resolver::{NeighborResolver, ResolveError, StoreNeighborResolver};
use crate::graph::store::CollabStore;
use crate::types::{Artist, EdgeKey, SearchResult, SearchStatus, TrackEvidence};

// ---------------------------------------------------------------------------
// Hooks
// ---------------------------------------------------------------------------

/// Point-in-time view of a running search, for status polling.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchProgress {
    /// Artist currently being expanded.
    pub artist: String,
    /// Edges of the current artist processed so far.
    pub count: usize,
    /// Total edges of the current artist.
    pub max: usize,
    /// Deepest frontier depth reached.
    pub depth: u32,
}

/// Shared handle onto one search's progress. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct ProgressHandle(Arc<Mutex<SearchProgress>>);

impl ProgressHandle {
    fn on_dequeue(&self, artist: &str, depth: u32) {
        let mut p = self.0.lock().unwrap();
        p.artist = artist.to_string();
        p.count = 0;
        p.max = 0;
        p.depth = p.depth.max(depth);
    }

    fn set_max(&self, max: usize) {
        self.0.lock().unwrap().max = max;
    }

    fn set_count(&self, count: usize) {
        self.0.lock().unwrap().count = count;
    }

    pub fn snapshot(&self) -> SearchProgress {
        self.0.lock().unwrap().clone()
    }
}

/// Cooperative cancellation flag, checked once per dequeued node.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The deduplicated neighborhood of one expanded artist, kept so a caller
/// polling a long search can inspect what has been explored so far.
#[derive(Debug, Clone, Serialize)]
pub struct CachedNeighbors {
    pub id: String,
    pub name: String,
    pub neighbors: Vec<CachedNeighbor>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CachedNeighbor {
    pub id: String,
    pub name: String,
    pub tracks: Vec<TrackEvidence>,
}

/// Per-search cache of expanded neighborhoods, keyed by lower-cased artist
/// name. Scoped to one search, so concurrent searches never see each
/// other's frontier.
#[derive(Debug, Clone, Default)]
pub struct NeighborCache(Arc<Mutex<HashMap<String, CachedNeighbors>>>);

impl NeighborCache {
    fn insert(&self, entry: CachedNeighbors) {
        let key = entry.name.to_lowercase();
        self.0.lock().unwrap().insert(key, entry);
    }

    pub fn get(&self, artist_name: &str) -> Option<CachedNeighbors> {
        self.0.lock().unwrap().get(&artist_name.to_lowercase()).cloned()
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything a caller can attach to observe or steer one search.
#[derive(Debug, Clone, Default)]
pub struct SearchHooks {
    pub progress: ProgressHandle,
    pub cancel: CancelToken,
    pub cache: NeighborCache,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// BFS engine over a neighbor resolver.
pub struct PathSearchEngine<'a, R: NeighborResolver> {
    resolver: &'a R,
    options: SearchOptions,
}

impl<'a, R: NeighborResolver> PathSearchEngine<'a, R> {
    pub fn new(resolver: &'a R, options: SearchOptions) -> Self {
        Self { resolver, options }
    }

    /// Run a search with default (inert) hooks.
    pub fn run(&self, start: &Artist, target: &Artist) -> Result<SearchResult> {
        self.run_with_hooks(start, target, &SearchHooks::default())
    }

    /// Run a search, reporting progress and honoring cancellation through
    /// `hooks`.
    pub fn run_with_hooks(
        &self,
        start: &Artist,
        target: &Artist,
        hooks: &SearchHooks,
    ) -> Result<SearchResult> {
        if start.id.is_empty() || target.id.is_empty() {
            return Ok(SearchResult::empty(
                start.clone(),
                target.clone(),
                SearchStatus::InvalidInput,
                "start or target artist is missing an identifier",
            ));
        }
        if start.id == target.id {
            return Ok(SearchResult::found(start.clone(), target.clone(), Vec::new()));
        }

        let started = Instant::now();

        let mut visited: HashSet<String> = HashSet::new();
        let mut prev: HashMap<String, String> = HashMap::new();
        let mut evidence: HashMap<EdgeKey, Vec<TrackEvidence>> = HashMap::new();
        let mut artists: HashMap<String, Artist> = HashMap::new();

        let mut queue: VecDeque<(Artist, u32)> = VecDeque::new();
        visited.insert(start.id.clone());
        artists.insert(start.id.clone(), start.clone());
        queue.push_back((start.clone(), 0));

        while let Some((current, depth)) = queue.pop_front() {
            if hooks.cancel.is_cancelled() {
                tracing::info!(start = %start.name, target = %target.name, "search cancelled");
                return Ok(SearchResult::empty(
                    start.clone(),
                    target.clone(),
                    SearchStatus::Cancelled,
                    "search cancelled by caller",
                ));
            }
            if started.elapsed() > self.options.max_duration() {
                tracing::warn!(
                    start = %start.name,
                    target = %target.name,
                    elapsed_s = started.elapsed().as_secs(),
                    "search exceeded time ceiling"
                );
                return Ok(SearchResult::empty(
                    start.clone(),
                    target.clone(),
                    SearchStatus::TimedOut,
                    format!(
                        "search exceeded the {}s time ceiling",
                        self.options.max_duration_secs
                    ),
                ));
            }
            // Depth guard before the (potentially expensive) resolver call.
            if self.options.max_depth > 0 && depth > self.options.max_depth {
                continue;
            }

            hooks.progress.on_dequeue(&current.name, depth);
            tracing::debug!(artist = %current.name, depth, "expanding");

            let edges = match self.resolver.resolve(&current, self.options.neighbor_limit) {
                Ok(edges) => edges,
                Err(ResolveError::RateLimited) => {
                    tracing::warn!(artist = %current.name, "rate limited; aborting search");
                    return Ok(SearchResult::empty(
                        start.clone(),
                        target.clone(),
                        SearchStatus::RateLimited,
                        "upstream rate limit reached; search aborted",
                    ));
                }
                Err(err) => {
                    tracing::warn!(artist = %current.name, error = %err, "neighbor resolution failed; skipping node");
                    continue;
                }
            };
            hooks.progress.set_max(edges.len());

            let mut cached = CachedNeighbors {
                id: current.id.clone(),
                name: current.name.clone(),
                neighbors: Vec::with_capacity(edges.len()),
            };

            for (i, edge) in edges.into_iter().enumerate() {
                hooks.progress.set_count(i + 1);
                if edge.artist.id.is_empty() {
                    continue;
                }

                let tracks = dedupe_tracks(edge.tracks, self.options.dedupe_threshold);
                cached.neighbors.push(CachedNeighbor {
                    id: edge.artist.id.clone(),
                    name: edge.artist.name.clone(),
                    tracks: tracks.clone(),
                });

                // An edge with no surviving evidence proves nothing.
                if tracks.is_empty() {
                    continue;
                }

                let child = edge.artist;
                artists
                    .entry(child.id.clone())
                    .or_insert_with(|| child.clone());

                if visited.insert(child.id.clone()) {
                    prev.insert(child.id.clone(), current.id.clone());
                    evidence.insert(EdgeKey::new(current.id.clone(), child.id.clone()), tracks);
                    queue.push_back((child.clone(), depth + 1));
                }

                if child.id == target.id {
                    hooks.cache.insert(cached);
                    let path = reconstruct_path(&prev, &evidence, &artists, &start.id, &target.id)?;
                    tracing::info!(
                        start = %start.name,
                        target = %target.name,
                        hops = path.len(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "path found"
                    );
                    return Ok(SearchResult::found(start.clone(), target.clone(), path));
                }
            }

            if !cached.neighbors.is_empty() {
                hooks.cache.insert(cached);
            }
        }

        let message = if self.options.max_depth > 0 {
            format!(
                "no path between {} and {} within {} hops",
                start.name, target.name, self.options.max_depth
            )
        } else {
            format!("no path between {} and {}", start.name, target.name)
        };
        Ok(SearchResult::empty(
            start.clone(),
            target.clone(),
            SearchStatus::NotFound,
            message,
        ))
    }
}

// ---------------------------------------------------------------------------
// Store-backed entry point
// ---------------------------------------------------------------------------

/// Resolve both artist names against the store and run a search with
/// default options plus the given depth bound (0 = unbounded).
pub fn run_search(store: &CollabStore, start: &str, target: &str, depth: u32) -> Result<SearchResult> {
    run_search_with_hooks(store, start, target, depth, &SearchHooks::default())
}

pub fn run_search_with_hooks(
    store: &CollabStore,
    start: &str,
    target: &str,
    depth: u32,
    hooks: &SearchHooks,
) -> Result<SearchResult> {
    if start.trim().is_empty() || target.trim().is_empty() {
        return Ok(SearchResult::empty(
            Artist::new("", start),
            Artist::new("", target),
            SearchStatus::InvalidInput,
            "start and target artist names are required",
        ));
    }

    let Some(start_artist) = store.artist_by_name(start)? else {
        return Ok(SearchResult::empty(
            Artist::new("", start),
            Artist::new("", target),
            SearchStatus::NotFound,
            format!("artist not found: {start}"),
        ));
    };
    let Some(target_artist) = store.artist_by_name(target)? else {
        return Ok(SearchResult::empty(
            start_artist,
            Artist::new("", target),
            SearchStatus::NotFound,
            format!("artist not found: {target}"),
        ));
    };

    let resolver = StoreNeighborResolver::new(store);
    let engine = PathSearchEngine::new(
        &resolver,
        SearchOptions {
            max_depth: depth,
            ..SearchOptions::default()
        },
    );
    engine.run_with_hooks(&start_artist, &target_artist, hooks)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
