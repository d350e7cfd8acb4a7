//! Path reconstruction from BFS bookkeeping.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::types::{Artist, EdgeKey, Hop, TrackEvidence};

/// Walk the predecessor map from `target_id` back to `start_id` and emit the
/// path as forward hops with their edge evidence attached.
///
/// Fails with [`Error::BrokenPredecessorChain`] if the chain runs out before
/// reaching the start, which indicates corrupted search state rather than an
/// absent path.
pub fn reconstruct_path(
    prev: &HashMap<String, String>,
    evidence: &HashMap<EdgeKey, Vec<TrackEvidence>>,
    artists: &HashMap<String, Artist>,
    start_id: &str,
    target_id: &str,
) -> Result<Vec<Hop>> {
    let mut ids = vec![target_id.to_string()];
    let mut cursor = target_id.to_string();

    // A well-formed chain is acyclic, so it can never be longer than the map.
    let mut budget = prev.len() + 1;
    while cursor != start_id {
        if budget == 0 {
            return Err(Error::BrokenPredecessorChain(cursor));
        }
        budget -= 1;

        match prev.get(&cursor) {
            Some(parent) => {
                ids.push(parent.clone());
                cursor = parent.clone();
            }
            None => return Err(Error::BrokenPredecessorChain(cursor)),
        }
    }
    ids.reverse();

    let mut hops = Vec::with_capacity(ids.len().saturating_sub(1));
    for pair in ids.windows(2) {
        let key = EdgeKey::new(pair[0].clone(), pair[1].clone());
        let tracks = match evidence.get(&key) {
            Some(t) => t.clone(),
            None => {
                tracing::warn!(parent = %pair[0], child = %pair[1], "edge on path has no recorded evidence");
                Vec::new()
            }
        };
        hops.push(Hop {
            from: artist_for(artists, &pair[0]),
            to: artist_for(artists, &pair[1]),
            tracks,
        });
    }

    Ok(hops)
}

// Fall back to the bare id when the name was never registered.
fn artist_for(artists: &HashMap<String, Artist>, id: &str) -> Artist {
    artists
        .get(id)
        .cloned()
        .unwrap_or_else(|| Artist::new(id, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evidence_for(parent: &str, child: &str, name: &str) -> (EdgeKey, Vec<TrackEvidence>) {
        (
            EdgeKey::new(parent, child),
            vec![TrackEvidence::new(name, format!("{parent}-{child}"), "")],
        )
    }

    #[test]
    fn two_hop_chain_reconstructs_in_forward_order() {
        let prev = HashMap::from([
            ("b".to_string(), "a".to_string()),
            ("c".to_string(), "b".to_string()),
        ]);
        let evidence = HashMap::from([
            evidence_for("a", "b", "First Duet"),
            evidence_for("b", "c", "Second Duet"),
        ]);
        let artists = HashMap::from([
            ("a".to_string(), Artist::new("a", "Alpha")),
            ("b".to_string(), Artist::new("b", "Bravo")),
            ("c".to_string(), Artist::new("c", "Charlie")),
        ]);

        let hops = reconstruct_path(&prev, &evidence, &artists, "a", "c").unwrap();
        assert_eq!(hops.len(), 2);
        assert_eq!(hops[0].from.name, "Alpha");
        assert_eq!(hops[0].to.name, "Bravo");
        assert_eq!(hops[0].tracks[0].name, "First Duet");
        assert_eq!(hops[1].from.id, "b");
        assert_eq!(hops[1].to.id, "c");
        // Hops are contiguous.
        assert_eq!(hops[0].to.id, hops[1].from.id);
    }

    #[test]
    fn trivial_chain_is_empty() {
        let hops = reconstruct_path(&HashMap::new(), &HashMap::new(), &HashMap::new(), "a", "a")
            .unwrap();
        assert!(hops.is_empty());
    }

    #[test]
    fn missing_link_is_an_error() {
        let prev = HashMap::from([("c".to_string(), "b".to_string())]);
        let err = reconstruct_path(&prev, &HashMap::new(), &HashMap::new(), "a", "c").unwrap_err();
        assert!(matches!(err, Error::BrokenPredecessorChain(_)));
    }

    #[test]
    fn unknown_artist_ids_fall_back_to_id_as_name() {
        let prev = HashMap::from([("b".to_string(), "a".to_string())]);
        let hops = reconstruct_path(&prev, &HashMap::new(), &HashMap::new(), "a", "b").unwrap();
        assert_eq!(hops[0].from.name, "a");
        assert!(hops[0].tracks.is_empty());
    }
}
