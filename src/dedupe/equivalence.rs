//! Track equivalence cascade.
//!
//! Seven checks, cheapest first; the first that fires decides. Two tracks
//! with no check firing are distinct.

use strsim::normalized_levenshtein;

use crate::dedupe::canon::TrackCanon;
use crate::types::TrackEvidence;

/// Decide whether two canonicalized tracks denote the same recording.
///
/// Order matters: identity evidence (shared cover art, shared track id)
/// outranks every text heuristic, so translated or transliterated titles
/// still merge when the backing release is the same.
pub fn same_track(a: &TrackCanon, b: &TrackCanon, threshold: f64) -> bool {
    // 1. Same cover art means same release, regardless of title language.
    if !a.raw.cover_url.is_empty() && a.raw.cover_url == b.raw.cover_url {
        return true;
    }

    // 2. Same external track id.
    if !a.raw.id.is_empty() && a.raw.id == b.raw.id {
        return true;
    }

    // 3. Exact core equality.
    if a.core == b.core {
        return true;
    }

    // 4. One core contained in the other ("lose yourself" vs
    //    "lose yourself - detroit 2009").
    if a.core.contains(&b.core) || b.core.contains(&a.core) {
        return true;
    }

    // 5. Same words, different order.
    if a.sorted_core == b.sorted_core {
        return true;
    }

    // 6. One token set a subset of the other.
    if is_subset(a, b) || is_subset(b, a) {
        return true;
    }

    // 7. Edit-distance similarity on the cores.
    normalized_levenshtein(&a.core, &b.core) >= threshold
}

/// Convenience wrapper over [`same_track`] for callers holding raw tracks.
pub fn is_likely_same_track(a: &TrackEvidence, b: &TrackEvidence, threshold: f64) -> bool {
    same_track(
        &TrackCanon::new(a.clone()),
        &TrackCanon::new(b.clone()),
        threshold,
    )
}

fn is_subset(a: &TrackCanon, b: &TrackCanon) -> bool {
    a.token_set.iter().all(|t| b.token_set.contains(t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedupe::DEFAULT_DEDUPE_THRESHOLD;

    fn canon(name: &str, id: &str, cover: &str) -> TrackCanon {
        TrackCanon::new(TrackEvidence::new(name, id, cover))
    }

    fn same(a: &TrackCanon, b: &TrackCanon) -> bool {
        same_track(a, b, DEFAULT_DEDUPE_THRESHOLD)
    }

    // -- identity evidence --------------------------------------------------

    #[test]
    fn shared_track_id_forces_merge_across_scripts() {
        let a = canon("Love The Way You Lie", "id-1", "");
        let b = canon("ラヴ・ザ・ウェイ・ユー・ライ", "id-1", "");
        assert!(same(&a, &b));
    }

    #[test]
    fn shared_cover_url_forces_merge() {
        let a = canon("Not Afraid", "x", "http://img/recovery.jpg");
        let b = canon("完全に違う名前", "y", "http://img/recovery.jpg");
        assert!(same(&a, &b));
    }

    #[test]
    fn empty_cover_urls_do_not_match_each_other() {
        let a = canon("Alpha Song", "x", "");
        let b = canon("Totally Different", "y", "");
        assert!(!same(&a, &b));
    }

    #[test]
    fn empty_ids_do_not_match_each_other() {
        let a = canon("Alpha Song", "", "");
        let b = canon("Omega Completely Unrelated", "", "");
        assert!(!same(&a, &b));
    }

    // -- textual cascade ----------------------------------------------------

    #[test]
    fn identical_cores_merge() {
        let a = canon("Lose Yourself", "a", "");
        let b = canon("lose yourself (Album Version)", "b", "");
        assert!(same(&a, &b));
    }

    #[test]
    fn substring_core_merges() {
        let a = canon("Lose Yourself", "a", "");
        let b = canon("Lose Yourself – Live in Detroit 2009", "b", "");
        assert!(same(&a, &b));
    }

    #[test]
    fn reordered_tokens_merge() {
        let a = canon("Yourself Lose Tonight", "a", "");
        let b = canon("Tonight Lose Yourself", "b", "");
        assert!(same(&a, &b));
    }

    #[test]
    fn roman_numeral_part_variants_merge() {
        let a = canon("Stan Pt. 2", "a", "");
        let b = canon("Stan Part II", "b", "");
        let c = canon("Stan part two", "c", "");
        assert!(same(&a, &b));
        assert!(same(&a, &c));
        assert!(same(&b, &c));
    }

    #[test]
    fn close_spelling_merges_under_levenshtein() {
        let a = canon("Cleanin' Out My Closet", "a", "");
        let b = canon("Cleanin Out My Kl0set", "b", "");
        assert!(same(&a, &b));
    }

    #[test]
    fn distinct_songs_stay_distinct() {
        let a = canon("The Real Slim Shady", "a", "");
        let b = canon("Without Me", "b", "");
        assert!(!same(&a, &b));
    }

    #[test]
    fn threshold_is_respected() {
        let a = canon("abcdef", "a", "");
        let b = canon("abcxyz", "b", "");
        // normalized levenshtein = 0.5 here
        assert!(same_track(&a, &b, 0.5));
        assert!(!same_track(&a, &b, 0.72));
    }

    #[test]
    fn raw_track_wrapper_agrees_with_canon_path() {
        let a = TrackEvidence::new("Mockingbird (Official Video)", "a", "");
        let b = TrackEvidence::new("Mockingbird", "b", "");
        assert!(is_likely_same_track(&a, &b, DEFAULT_DEDUPE_THRESHOLD));
    }
}
