//! Precomputed canonical signature for one track.

use std::collections::HashSet;

use crate::dedupe::normalize::{normalize_title, strip_version_noise};
use crate::types::TrackEvidence;

/// A track plus every derived form the equivalence cascade compares on.
///
/// Signatures are computed once when the canon is built and never refreshed,
/// even if the underlying track is later mutated by a cluster merge. Cluster
/// membership is therefore decided against the seed track's signature.
#[derive(Debug, Clone)]
pub struct TrackCanon {
    /// The raw track as received. Merges mutate this copy only.
    pub raw: TrackEvidence,
    /// Normalized full title.
    pub norm: String,
    /// Normalized title with version noise removed.
    pub core: String,
    /// Core tokens in original order.
    pub tokens: Vec<String>,
    /// Core tokens as a set, for subset comparison.
    pub token_set: HashSet<String>,
    /// Core tokens sorted and re-joined, for word-order-insensitive equality.
    pub sorted_core: String,
}

impl TrackCanon {
    pub fn new(raw: TrackEvidence) -> Self {
        let norm = normalize_title(&raw.name);
        let core = strip_version_noise(&norm);

        let tokens: Vec<String> = core.split_whitespace().map(str::to_string).collect();
        let token_set: HashSet<String> = tokens.iter().cloned().collect();

        let mut sorted = tokens.clone();
        sorted.sort_unstable();
        let sorted_core = sorted.join(" ");

        Self {
            raw,
            norm,
            core,
            tokens,
            token_set,
            sorted_core,
        }
    }
}
