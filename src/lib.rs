//! collabgraph — shortest collaboration paths between musical artists.
//!
//! Breadth-first search over a lazily-resolved collaboration graph, with a
//! fuzzy track-deduplication pipeline that collapses remixes, "feat."
//! variants, and transliterations into canonical edge evidence.

pub mod config;
pub mod db;
pub mod dedupe;
pub mod error;
pub mod graph;
pub mod jobs;
pub mod observability;
pub mod types;
