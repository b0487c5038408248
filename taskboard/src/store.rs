//! Client-side cache of the task collection.
//!
//! The store holds the last server-confirmed task list under a single query
//! identity. It is only ever replaced wholesale: [`TaskStore::refresh`] swaps
//! in a new immutable snapshot and [`TaskStore::invalidate`] marks the current
//! one stale. There is deliberately no way to patch a single task.
//!
//! Concurrent refreshes are not serialized. Whichever completes last
//! overwrites the snapshot (last-write-wins over the whole collection).

use std::sync::Arc;

use parking_lot::RwLock;
use taskboard_proto::task::{Task, TaskId};

use crate::api::{ApiError, TaskApi};

/// Query identity of the task collection.
pub const TASKS_QUERY_KEY: &str = "tasks";

/// An immutable, shareable view of the task list.
pub type Snapshot = Arc<[Task]>;

#[derive(Debug, Default)]
struct StoreState {
    snapshot: Option<Snapshot>,
    stale: bool,
    generation: u64,
    invalidations: u64,
}

/// Handle to a task cache. Clones share the same cache.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    inner: Arc<RwLock<StoreState>>,
}

impl TaskStore {
    /// Creates an empty store. The first read needs a refresh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `tasks` as confirmed state.
    #[must_use]
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let store = Self::new();
        store.replace(tasks.into());
        store
    }

    /// Fetches the task list from `api` and replaces the cached snapshot.
    ///
    /// On failure the cached snapshot and its stale flag are left untouched.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's [`ApiError`] if the fetch fails.
    pub async fn refresh<A: TaskApi>(&self, api: &A) -> Result<Snapshot, ApiError> {
        match api.list_tasks().await {
            Ok(tasks) => {
                warn_unknown_statuses(&tasks);
                let snapshot: Snapshot = tasks.into();
                let generation = self.replace(Arc::clone(&snapshot));
                tracing::debug!(
                    query = TASKS_QUERY_KEY,
                    count = snapshot.len(),
                    generation,
                    "task store refreshed"
                );
                Ok(snapshot)
            }
            Err(e) => {
                tracing::warn!(query = TASKS_QUERY_KEY, error = %e, "task store refresh failed");
                Err(e)
            }
        }
    }

    /// Marks the cached list stale so the next [`read_fresh`](Self::read_fresh) refetches.
    pub fn invalidate(&self) {
        let mut state = self.inner.write();
        state.stale = true;
        state.invalidations += 1;
        tracing::trace!(
            query = TASKS_QUERY_KEY,
            invalidations = state.invalidations,
            "task store invalidated"
        );
    }

    /// Returns the cached snapshot without touching the network.
    #[must_use]
    pub fn read(&self) -> Option<Snapshot> {
        self.inner.read().snapshot.clone()
    }

    /// Returns the cached snapshot, refreshing first if it is missing or stale.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's [`ApiError`] if a needed refresh fails.
    pub async fn read_fresh<A: TaskApi>(&self, api: &A) -> Result<Snapshot, ApiError> {
        let cached = {
            let state = self.inner.read();
            if state.stale {
                None
            } else {
                state.snapshot.clone()
            }
        };
        match cached {
            Some(snapshot) => Ok(snapshot),
            None => self.refresh(api).await,
        }
    }

    /// Whether the cached list has been invalidated since the last refresh.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.inner.read().stale
    }

    /// Number of times the store has been invalidated.
    ///
    /// Readers that cannot refetch themselves use this to request at most one
    /// refresh per invalidation.
    #[must_use]
    pub fn invalidations(&self) -> u64 {
        self.inner.read().invalidations
    }

    /// Whether the store has ever been populated.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.inner.read().snapshot.is_some()
    }

    /// Number of snapshots installed so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.inner.read().generation
    }

    /// Looks up one task in the cached snapshot.
    #[must_use]
    pub fn find(&self, id: TaskId) -> Option<Task> {
        self.inner
            .read()
            .snapshot
            .as_ref()
            .and_then(|tasks| tasks.iter().find(|t| t.id == id).cloned())
    }

    /// Installs a new snapshot and returns its generation.
    fn replace(&self, snapshot: Snapshot) -> u64 {
        let mut state = self.inner.write();
        state.snapshot = Some(snapshot);
        state.stale = false;
        state.generation += 1;
        state.generation
    }
}

/// Logs each task the board will leave out, once per fetched snapshot.
fn warn_unknown_statuses(tasks: &[Task]) {
    for task in tasks.iter().filter(|t| t.status().is_none()) {
        tracing::warn!(
            task_id = %task.id,
            status = %task.status,
            "task has an unrecognized status; leaving it off the board"
        );
    }
}
