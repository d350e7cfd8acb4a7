//! Collaboration graph: storage, lazy neighbor resolution, and path search.

pub mod reconstruct;
pub mod resolver;
pub mod search;
pub mod store;

pub use reconstruct::reconstruct_path;
pub use resolver::{
    lookup_neighbors, NeighborListing, NeighborResolver, ResolveError, StoreNeighborResolver,
    RESOLVER_DEFAULT_LIMIT,
};
pub use search::{
    run_search, CancelToken, NeighborCache, PathSearchEngine, ProgressHandle, SearchHooks,
    SearchProgress,
};
pub use store::{CollabStore, CollabTrack, StoreStats};
