//! Asynchronous search jobs.
//!
//! A registry of background searches: submit returns an opaque id
//! immediately, the search runs on its own thread with its own store
//! connection, and callers poll status/progress or cancel through the id.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::graph::search::{run_search_with_hooks, CachedNeighbors, SearchHooks, SearchProgress};
use crate::graph::store::CollabStore;
use crate::types::{SearchRequest, SearchResult, SearchStatus};

/// Lifecycle of one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Finished,
    Error,
}

/// Point-in-time view of one job.
#[derive(Debug, Clone, Serialize)]
pub struct JobSnapshot {
    pub id: String,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<SearchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub progress: SearchProgress,
}

struct JobEntry {
    status: JobStatus,
    result: Option<SearchResult>,
    error: Option<String>,
    hooks: SearchHooks,
    handle: Option<JoinHandle<()>>,
}

struct Inner {
    next_id: u64,
    jobs: HashMap<String, JobEntry>,
}

/// Thread-safe job registry. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct JobRegistry {
    inner: Arc<Mutex<Inner>>,
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl JobRegistry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                next_id: 1,
                jobs: HashMap::new(),
            })),
        }
    }

    /// Submit an arbitrary search closure. The closure receives the job's
    /// hooks so cancellation and progress polling work through the registry.
    pub fn submit<F>(&self, run: F) -> String
    where
        F: FnOnce(&SearchHooks) -> Result<SearchResult> + Send + 'static,
    {
        let hooks = SearchHooks::default();
        let id = {
            let mut inner = self.inner.lock().unwrap();
            let id = format!("job-{}", inner.next_id);
            inner.next_id += 1;
            inner.jobs.insert(
                id.clone(),
                JobEntry {
                    status: JobStatus::Pending,
                    result: None,
                    error: None,
                    hooks: hooks.clone(),
                    handle: None,
                },
            );
            id
        };

        let registry = self.clone();
        let job_id = id.clone();
        let handle = std::thread::spawn(move || {
            registry.set_status(&job_id, JobStatus::Running);
            match run(&hooks) {
                Ok(result) => registry.finish(&job_id, result),
                Err(err) => registry.fail(&job_id, err.to_string()),
            }
        });

        if let Some(entry) = self.inner.lock().unwrap().jobs.get_mut(&id) {
            entry.handle = Some(handle);
        }
        id
    }

    /// Submit a name-based search against the database at `db_path`. The
    /// worker opens its own connection, since a store handle is not `Sync`.
    pub fn submit_search(&self, db_path: String, request: SearchRequest) -> String {
        self.submit(move |hooks| {
            let store = CollabStore::open(&db_path)?;
            run_search_with_hooks(&store, &request.start, &request.target, request.depth, hooks)
        })
    }

    pub fn snapshot(&self, id: &str) -> Option<JobSnapshot> {
        let inner = self.inner.lock().unwrap();
        inner.jobs.get(id).map(|entry| JobSnapshot {
            id: id.to_string(),
            status: entry.status,
            result: entry.result.clone(),
            error: entry.error.clone(),
            progress: entry.hooks.progress.snapshot(),
        })
    }

    pub fn progress(&self, id: &str) -> Option<SearchProgress> {
        let inner = self.inner.lock().unwrap();
        inner.jobs.get(id).map(|e| e.hooks.progress.snapshot())
    }

    /// Expanded neighborhood of one artist within a job's search, if that
    /// artist has been dequeued already.
    pub fn neighbors(&self, id: &str, artist_name: &str) -> Option<CachedNeighbors> {
        let inner = self.inner.lock().unwrap();
        inner.jobs.get(id).and_then(|e| e.hooks.cache.get(artist_name))
    }

    /// Request cooperative cancellation. Returns false for unknown ids.
    pub fn cancel(&self, id: &str) -> bool {
        let inner = self.inner.lock().unwrap();
        match inner.jobs.get(id) {
            Some(entry) => {
                entry.hooks.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Block until the job's worker thread exits, then return its snapshot.
    pub fn wait(&self, id: &str) -> Result<JobSnapshot> {
        let handle = {
            let mut inner = self.inner.lock().unwrap();
            match inner.jobs.get_mut(id) {
                Some(entry) => entry.handle.take(),
                None => return Err(Error::Job(format!("unknown job: {id}"))),
            }
        };

        if let Some(handle) = handle {
            if handle.join().is_err() {
                self.fail(id, "search worker panicked".to_string());
            }
        }

        self.snapshot(id)
            .ok_or_else(|| Error::Job(format!("unknown job: {id}")))
    }

    fn set_status(&self, id: &str, status: JobStatus) {
        if let Some(entry) = self.inner.lock().unwrap().jobs.get_mut(id) {
            entry.status = status;
        }
    }

    // A search that terminates without a path is a finished job with the
    // terminal status in its result, not a registry-level error.
    fn finish(&self, id: &str, result: SearchResult) {
        if let Some(entry) = self.inner.lock().unwrap().jobs.get_mut(id) {
            entry.status = if result.status == SearchStatus::Found {
                JobStatus::Finished
            } else {
                JobStatus::Error
            };
            if entry.status == JobStatus::Error {
                entry.error = result
                    .message
                    .clone()
                    .or_else(|| Some(format!("search ended with status {}", result.status.code())));
            }
            entry.result = Some(result);
        }
    }

    fn fail(&self, id: &str, message: String) {
        if let Some(entry) = self.inner.lock().unwrap().jobs.get_mut(id) {
            entry.status = JobStatus::Error;
            entry.error = Some(message);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
