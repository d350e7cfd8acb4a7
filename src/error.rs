//! Crate-wide error type.

use thiserror::Error;

/// All failure modes surfaced by the library.
///
/// Per-node resolver failures are recovered inside the search engine and
/// never reach this enum; what does reach it is genuinely fatal to the
/// operation at hand.
#[derive(Debug, Error)]
pub enum Error {
    /// SQLite-level failure from the backing store.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The engine reported a found target but the predecessor chain does
    /// not lead back to the start node. This is an internal invariant
    /// violation, never a "no path" result.
    #[error("predecessor chain broken at {0:?} during path reconstruction")]
    BrokenPredecessorChain(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A background job disappeared or its worker thread panicked.
    #[error("job failed: {0}")]
    Job(String),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
