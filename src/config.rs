//! Search tuning knobs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default number of distinct collaboration rows fetched per expanded
/// artist when the caller does not specify a limit.
pub const DEFAULT_NEIGHBOR_LIMIT: usize = 5000;

/// Hard ceiling on any caller-supplied neighbor limit.
pub const MAX_NEIGHBOR_LIMIT: usize = 20_000;

/// Wall-clock ceiling for one whole search.
pub const MAX_SEARCH_DURATION: Duration = Duration::from_secs(3000);

fn default_neighbor_limit() -> usize {
    DEFAULT_NEIGHBOR_LIMIT
}

fn default_dedupe_threshold() -> f64 {
    crate::dedupe::EDGE_DEDUPE_THRESHOLD
}

fn default_max_duration_secs() -> u64 {
    MAX_SEARCH_DURATION.as_secs()
}

/// Per-search options. All fields have working defaults, so a request only
/// needs to override what it cares about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Maximum hop depth to expand; 0 means unbounded.
    #[serde(default)]
    pub max_depth: u32,

    /// Neighbor rows considered per expanded artist. Clamped to
    /// [`MAX_NEIGHBOR_LIMIT`] by the resolver.
    #[serde(default = "default_neighbor_limit")]
    pub neighbor_limit: usize,

    /// Similarity threshold for deduplicating edge evidence mid-search.
    /// Looser than the general default because evidence for one artist
    /// pair is near-certainly the same song in many dressings.
    #[serde(default = "default_dedupe_threshold")]
    pub dedupe_threshold: f64,

    /// Wall-clock ceiling in seconds for the whole search.
    #[serde(default = "default_max_duration_secs")]
    pub max_duration_secs: u64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_depth: 0,
            neighbor_limit: DEFAULT_NEIGHBOR_LIMIT,
            dedupe_threshold: crate::dedupe::EDGE_DEDUPE_THRESHOLD,
            max_duration_secs: MAX_SEARCH_DURATION.as_secs(),
        }
    }
}

impl SearchOptions {
    pub fn max_duration(&self) -> Duration {
        Duration::from_secs(self.max_duration_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let opts = SearchOptions::default();
        assert_eq!(opts.max_depth, 0);
        assert_eq!(opts.neighbor_limit, 5000);
        assert!((opts.dedupe_threshold - 0.65).abs() < f64::EPSILON);
        assert_eq!(opts.max_duration(), Duration::from_secs(3000));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let opts: SearchOptions = serde_json::from_str(r#"{"max_depth": 4}"#).unwrap();
        assert_eq!(opts.max_depth, 4);
        assert_eq!(opts.neighbor_limit, DEFAULT_NEIGHBOR_LIMIT);
        assert_eq!(opts.max_duration_secs, 3000);
    }
}
