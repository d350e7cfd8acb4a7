//! Track deduplication pipeline.
//!
//! Collapses near-duplicate recordings (remixes, "feat." variants,
//! diacritic/translation variants, Roman-numeral part markers) into one
//! canonical representative per cluster. The pipeline is layered:
//! [`normalize`] → [`canon`] → [`equivalence`] → [`cluster`].

pub mod canon;
pub mod cluster;
pub mod equivalence;
pub mod normalize;

pub use canon::TrackCanon;
pub use cluster::{dedupe_tracks, DEFAULT_DEDUPE_THRESHOLD, EDGE_DEDUPE_THRESHOLD};
pub use equivalence::{is_likely_same_track, same_track};
pub use normalize::{normalize_title, strip_version_noise};
