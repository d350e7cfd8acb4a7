//! collabgraph CLI.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use collabgraph::config::SearchOptions;
use collabgraph::graph::{
    lookup_neighbors, CollabStore, PathSearchEngine, StoreNeighborResolver,
};
use collabgraph::observability;
use collabgraph::types::SearchResult;

#[derive(Parser)]
#[command(name = "collabgraph", version, about = "Shortest collaboration paths between musical artists")]
struct Cli {
    /// Path to the collaboration graph database.
    #[arg(long, global = true, default_value = "collabgraph.db")]
    db: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find the shortest collaboration path between two artists.
    Search {
        /// Starting artist name.
        start: String,
        /// Target artist name.
        target: String,
        /// Maximum search depth; 0 means unbounded.
        #[arg(long, default_value_t = 0)]
        depth: u32,
        /// Collaboration rows considered per expanded artist.
        #[arg(long)]
        limit: Option<usize>,
        /// Similarity threshold for per-edge track dedup.
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// List the direct collaborators of one artist.
    Neighbors {
        /// Artist name.
        name: String,
        /// Maximum collaboration rows to read; 0 uses the resolver default.
        #[arg(long, default_value_t = 0)]
        limit: usize,
    },
    /// Print table counts for the database.
    Stats,
}

fn main() -> ExitCode {
    observability::init_logging();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> collabgraph::error::Result<ExitCode> {
    let store = CollabStore::open(&cli.db)?;

    match cli.command {
        Command::Search {
            start,
            target,
            depth,
            limit,
            threshold,
        } => {
            let result = search(&store, &start, &target, depth, limit, threshold)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            if result.status.is_found() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Command::Neighbors { name, limit } => match lookup_neighbors(&store, &name, limit)? {
            Some(listing) => {
                println!("{}", serde_json::to_string_pretty(&listing)?);
                Ok(ExitCode::SUCCESS)
            }
            None => {
                eprintln!("artist not found: {name}");
                Ok(ExitCode::FAILURE)
            }
        },
        Command::Stats => {
            let stats = store.stats()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn search(
    store: &CollabStore,
    start: &str,
    target: &str,
    depth: u32,
    limit: Option<usize>,
    threshold: Option<f64>,
) -> collabgraph::error::Result<SearchResult> {
    let mut options = SearchOptions {
        max_depth: depth,
        ..SearchOptions::default()
    };
    if let Some(limit) = limit {
        options.neighbor_limit = limit;
    }
    if let Some(threshold) = threshold {
        options.dedupe_threshold = threshold;
    }

    // Name resolution mirrors run_search but keeps the custom options.
    use collabgraph::types::{Artist, SearchStatus};
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
    PathSearchEngine::new(&resolver, options).run(&start_artist, &target_artist)
}
