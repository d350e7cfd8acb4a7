//! Greedy online clustering over a track list.

use std::time::Instant;

use crate::dedupe::canon::TrackCanon;
use crate::dedupe::equivalence::same_track;
use crate::observability;
use crate::types::TrackEvidence;

/// Similarity threshold used when deduplicating the evidence of a single
/// collaboration edge. Looser than the general default: evidence for one
/// artist pair is near-certainly the same song in many dressings.
pub const EDGE_DEDUPE_THRESHOLD: f64 = 0.65;

/// General-purpose similarity threshold.
pub const DEFAULT_DEDUPE_THRESHOLD: f64 = 0.72;

/// Collapse a track list into one representative per equivalence cluster.
///
/// Single pass in input order. Each track is compared against the accepted
/// clusters in creation order and merged into the first match; otherwise it
/// seeds a new cluster. Output preserves first-seen order, so the result is
/// deterministic for a given input order (and only for that order — this is
/// greedy clustering, not a transitive closure).
pub fn dedupe_tracks(input: Vec<TrackEvidence>, threshold: f64) -> Vec<TrackEvidence> {
    let started = Instant::now();
    let input_count = input.len();

    let mut clusters: Vec<TrackCanon> = Vec::new();
    for canon in input.into_iter().map(TrackCanon::new) {
        match clusters
            .iter_mut()
            .find(|c| same_track(c, &canon, threshold))
        {
            Some(cluster) => merge_into(&mut cluster.raw, canon.raw),
            None => clusters.push(canon),
        }
    }

    let out: Vec<TrackEvidence> = clusters.into_iter().map(|c| c.raw).collect();
    observability::record_dedupe_metrics(input_count, out.len(), threshold, started.elapsed());
    out
}

/// Fold an incoming duplicate into the cluster representative.
///
/// The longer display name wins. Identity fields only fill blanks: an id or
/// cover URL already present on the representative is never overwritten.
fn merge_into(rep: &mut TrackEvidence, incoming: TrackEvidence) {
    if incoming.name.len() > rep.name.len() {
        rep.name = incoming.name;
    }
    if rep.id.is_empty() && !incoming.id.is_empty() {
        rep.id = incoming.id;
    }
    if rep.cover_url.is_empty() && !incoming.cover_url.is_empty() {
        rep.cover_url = incoming.cover_url;
    }
    if rep.recording_id.is_empty() && !incoming.recording_id.is_empty() {
        rep.recording_id = incoming.recording_id;
    }
    if rep.recording_name.is_empty() && !incoming.recording_name.is_empty() {
        rep.recording_name = incoming.recording_name;
    }
}
