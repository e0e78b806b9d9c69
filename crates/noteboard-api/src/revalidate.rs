//! View cache and revalidation.
//!
//! Rendered views (board, category listing, note detail) are cached per user
//! and per path. Successful mutations revalidate the affected paths; the
//! views are recomputed lazily on the next request.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

use async_trait::async_trait;
use lru::LruCache;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// Identifier of a cacheable view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewPath {
    /// The board listing every category and note.
    Board,
    /// One category and its notes.
    Category(Uuid),
    /// One note's detail view.
    Note(Uuid),
}

impl fmt::Display for ViewPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewPath::Board => write!(f, "/notes"),
            ViewPath::Category(id) => write!(f, "/notes/category/{id}"),
            ViewPath::Note(id) => write!(f, "/notes/{id}"),
        }
    }
}

/// Receives the paths whose cached output went stale.
#[async_trait]
pub trait Revalidator: Send + Sync {
    async fn revalidate(&self, path: &ViewPath);
}

/// Revalidator that drops every notification.
pub struct NoopRevalidator;

#[async_trait]
impl Revalidator for NoopRevalidator {
    async fn revalidate(&self, _path: &ViewPath) {}
}

/// Revalidator that remembers every path it was given, in order.
#[derive(Clone, Default)]
pub struct RecordingRevalidator {
    paths: Arc<Mutex<Vec<ViewPath>>>,
}

impl RecordingRevalidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths revalidated so far.
    pub async fn paths(&self) -> Vec<ViewPath> {
        self.paths.lock().await.clone()
    }

    /// Forget everything recorded so far.
    pub async fn clear(&self) {
        self.paths.lock().await.clear();
    }
}

#[async_trait]
impl Revalidator for RecordingRevalidator {
    async fn revalidate(&self, path: &ViewPath) {
        self.paths.lock().await.push(*path);
    }
}

struct CacheState {
    entries: LruCache<(String, ViewPath), Value>,
    /// Bumped by every invalidation.
    epoch: u64,
}

/// LRU cache of computed views keyed by user and path.
///
/// A view computed while an invalidation ran may already be stale, so
/// callers read [`ViewCache::epoch`] before computing and store the result
/// with [`ViewCache::insert_if_unchanged`].
#[derive(Clone)]
pub struct ViewCache {
    state: Arc<Mutex<CacheState>>,
}

impl ViewCache {
    /// Create a cache holding at most `capacity` views (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            state: Arc::new(Mutex::new(CacheState {
                entries: LruCache::new(capacity),
                epoch: 0,
            })),
        }
    }

    pub async fn get(&self, user_id: &str, path: &ViewPath) -> Option<Value> {
        let mut state = self.state.lock().await;
        state.entries.get(&(user_id.to_string(), *path)).cloned()
    }

    pub async fn epoch(&self) -> u64 {
        self.state.lock().await.epoch
    }

    pub async fn insert(&self, user_id: &str, path: ViewPath, view: Value) {
        let mut state = self.state.lock().await;
        state.entries.put((user_id.to_string(), path), view);
    }

    /// Store `view` only if nothing was invalidated since `epoch` was read.
    pub async fn insert_if_unchanged(
        &self,
        user_id: &str,
        path: ViewPath,
        epoch: u64,
        view: Value,
    ) -> bool {
        let mut state = self.state.lock().await;
        if state.epoch != epoch {
            return false;
        }
        state.entries.put((user_id.to_string(), path), view);
        true
    }

    /// Drop the view at `path` for every user. Returns how many were dropped.
    pub async fn invalidate(&self, path: &ViewPath) -> usize {
        let mut state = self.state.lock().await;
        state.epoch += 1;
        let stale: Vec<(String, ViewPath)> = state
            .entries
            .iter()
            .filter(|((_, p), _)| p == path)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &stale {
            state.entries.pop(key);
        }
        stale.len()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.entries.is_empty()
    }
}

#[async_trait]
impl Revalidator for ViewCache {
    async fn revalidate(&self, path: &ViewPath) {
        let dropped = self.invalidate(path).await;
        debug!(
            subsystem = "api",
            component = "view_cache",
            op = "revalidate",
            path = %path,
            dropped,
            "View revalidated"
        );
    }
}
