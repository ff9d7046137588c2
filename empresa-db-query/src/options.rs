//! Cached, dependency-aware filter option lists.
//!
//! Option lists are expensive distinct queries against the warehouse, and
//! the same list is requested on every control render. This module memoizes
//! them per `(dimension, parent selection)` key with single-flight
//! deduplication: concurrent first requests for the same key share exactly
//! one underlying fetch.
//!
//! Entries never expire on their own — the option domains change rarely —
//! but `invalidate` and `clear` are explicit hooks, and `SimpleOptionCache`
//! bounds its entry count, because a never-expiring cache keyed by parent
//! combination grows without limit under many distinct parent selections.

use crate::dimension::FilterDimension;
use crate::error::Result as QueryResult;
use crate::selection::FilterSelection;
use crate::source::{DataSource, OptionValue, SourceError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Cache key: dimension name plus the SORTED parent selection.
///
/// Sorting makes the key order-insensitive — `["SP","RJ"]` and `["RJ","SP"]`
/// constrain the same option domain — while distinct parent combinations
/// remain distinct entries. Independent dimensions use an empty parent list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OptionKey {
    dimension: String,
    parents: Vec<String>,
}

impl OptionKey {
    /// Key for an independent dimension.
    pub fn independent(dimension: impl Into<String>) -> Self {
        Self {
            dimension: dimension.into(),
            parents: Vec::new(),
        }
    }

    /// Key for a dependent dimension under the given parent values.
    pub fn dependent(dimension: impl Into<String>, parent_values: &[String]) -> Self {
        let mut parents = parent_values.to_vec();
        parents.sort();
        Self {
            dimension: dimension.into(),
            parents,
        }
    }
}

/// Shared, ordered option list.
pub type Options = Arc<[OptionValue]>;

type FetchResult = std::result::Result<Options, SourceError>;

/// Cache statistics.
#[derive(Debug, Default, Clone, Copy)]
pub struct CacheStats {
    /// Ready and deduplicated in-flight hits
    pub hits: u64,
    /// Misses that triggered a fetch
    pub misses: u64,
    /// Entries removed by `invalidate` or capacity eviction
    pub evictions: u64,
}

/// Cache of option lists with get-or-fetch semantics.
///
/// The fetch closure runs only on a miss. Implementations must deduplicate
/// concurrent requests for the same key into a single fetch.
#[async_trait]
pub trait OptionCache: Send + Sync {
    /// Get the options for a key, or fetch and cache them.
    async fn get_or_fetch<F, Fut>(&self, key: &OptionKey, fetch: F) -> FetchResult
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = FetchResult> + Send;

    /// Explicitly drop one entry.
    fn invalidate(&self, key: &OptionKey);

    /// Drop all entries.
    fn clear(&self);

    /// Number of ready entries.
    fn len(&self) -> usize;

    /// Whether the cache holds no ready entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A no-op cache that always calls the fetch function. For testing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

#[async_trait]
impl OptionCache for NoCache {
    async fn get_or_fetch<F, Fut>(&self, _key: &OptionKey, fetch: F) -> FetchResult
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = FetchResult> + Send,
    {
        fetch().await
    }

    fn invalidate(&self, _key: &OptionKey) {}

    fn clear(&self) {}

    fn len(&self) -> usize {
        0
    }
}

/// Entry state - either completed or in-flight.
enum CacheEntry {
    /// Options are ready
    Ready(Options),
    /// Options are being fetched - waiters share this mutex.
    /// The Option is None while fetching, Some after completion.
    InFlight(Arc<futures::lock::Mutex<Option<FetchResult>>>),
}

/// Thread-safe option cache with single-flight deduplication.
///
/// A miss installs an in-flight marker before fetching; concurrent callers
/// for the same key wait on the marker's mutex instead of fetching again.
/// A failed fetch removes the marker so later calls retry. An orphaned
/// marker (the fetching task was dropped mid-fetch) is detected by waiters
/// and retried.
pub struct SimpleOptionCache {
    entries: RwLock<HashMap<OptionKey, CacheEntry>>,
    max_entries: usize,
    stats: RwLock<CacheStats>,
}

impl SimpleOptionCache {
    /// Create a cache bounded to `max_entries` ready entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_entries,
            stats: RwLock::new(CacheStats::default()),
        }
    }

    /// Current statistics.
    pub fn stats(&self) -> CacheStats {
        *self.stats.read().unwrap()
    }
}

#[async_trait]
impl OptionCache for SimpleOptionCache {
    async fn get_or_fetch<F, Fut>(&self, key: &OptionKey, fetch: F) -> FetchResult
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = FetchResult> + Send,
    {
        // `fetch` is `FnOnce`, but the lookup may need to retry if it finds
        // an orphaned in-flight marker. Keep it in an Option so it still runs
        // exactly once when this caller becomes the fetcher.
        let mut fetch = Some(fetch);

        enum Action {
            Hit(Options),
            Wait(Arc<futures::lock::Mutex<Option<FetchResult>>>),
            Fetch(Arc<futures::lock::Mutex<Option<FetchResult>>>),
        }

        loop {
            let action = {
                let mut entries = self.entries.write().unwrap();
                match entries.get(key) {
                    Some(CacheEntry::Ready(options)) => {
                        self.stats.write().unwrap().hits += 1;
                        Action::Hit(options.clone())
                    }
                    Some(CacheEntry::InFlight(mutex)) => {
                        // Deduplicated: wait on the fetcher's mutex.
                        self.stats.write().unwrap().hits += 1;
                        Action::Wait(mutex.clone())
                    }
                    None => {
                        let mut stats = self.stats.write().unwrap();
                        stats.misses += 1;

                        // Evict a Ready entry if at capacity; never an InFlight.
                        if entries.len() >= self.max_entries {
                            let ready_key = entries
                                .iter()
                                .find(|(_, v)| matches!(v, CacheEntry::Ready(_)))
                                .map(|(k, _)| k.clone());
                            if let Some(old_key) = ready_key {
                                entries.remove(&old_key);
                                stats.evictions += 1;
                            }
                        }

                        let mutex = Arc::new(futures::lock::Mutex::new(None));
                        entries.insert(key.clone(), CacheEntry::InFlight(mutex.clone()));
                        Action::Fetch(mutex)
                    }
                }
            };

            match action {
                Action::Hit(options) => return Ok(options),
                Action::Wait(mutex) => {
                    // The fetcher holds the lock until it is done.
                    let guard = mutex.lock().await;
                    match guard.as_ref() {
                        Some(result) => return result.clone(),
                        None => {
                            // Orphaned in-flight: the fetcher was dropped before
                            // populating the result. Remove the stale marker (if
                            // it still matches this mutex) and retry.
                            drop(guard);
                            let mut entries = self.entries.write().unwrap();
                            let stale = matches!(
                                entries.get(key),
                                Some(CacheEntry::InFlight(m)) if Arc::ptr_eq(m, &mutex)
                            );
                            if stale {
                                entries.remove(key);
                            }
                            continue;
                        }
                    }
                }
                Action::Fetch(mutex) => {
                    // Acquire the lock first so waiters block until completion.
                    let mut guard = mutex.lock().await;

                    let do_fetch = fetch
                        .take()
                        .expect("SimpleOptionCache::get_or_fetch fetch called more than once");
                    let result = do_fetch().await;
                    *guard = Some(result.clone());
                    drop(guard);

                    let mut entries = self.entries.write().unwrap();
                    match result {
                        Ok(options) => {
                            entries.insert(key.clone(), CacheEntry::Ready(options.clone()));
                            return Ok(options);
                        }
                        Err(e) => {
                            // Remove the marker so future requests retry.
                            entries.remove(key);
                            return Err(e);
                        }
                    }
                }
            }
        }
    }

    fn invalidate(&self, key: &OptionKey) {
        if self.entries.write().unwrap().remove(key).is_some() {
            self.stats.write().unwrap().evictions += 1;
            debug!(?key, "option cache entry invalidated");
        }
    }

    fn clear(&self) {
        self.entries.write().unwrap().clear();
    }

    fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap()
            .values()
            .filter(|v| matches!(v, CacheEntry::Ready(_)))
            .count()
    }
}

/// A data source paired with an option cache.
///
/// This is what filter controls render from: `get` resolves a dimension's
/// current option list through the cache, honoring the dependency rule that
/// a dependent dimension with no parent selection has an EMPTY option domain
/// (no fetch, no error).
pub struct CachedOptions<S, C = SimpleOptionCache> {
    source: Arc<S>,
    cache: C,
}

impl<S: DataSource, C: OptionCache> CachedOptions<S, C> {
    /// Pair a source with a cache.
    pub fn new(source: Arc<S>, cache: C) -> Self {
        Self { source, cache }
    }

    /// The ordered option list for `dimension` under the current selection.
    pub async fn get(
        &self,
        dimension: &FilterDimension,
        selection: &FilterSelection,
    ) -> QueryResult<Options> {
        let (key, parent_values) = match &dimension.parent {
            None => (OptionKey::independent(&dimension.name), Vec::new()),
            Some(parent) => {
                let parent_values = selection.get(&parent.dimension).to_vec();
                if parent_values.is_empty() {
                    // No parent selected: the child domain is empty, not an error.
                    return Ok(Arc::from(Vec::<OptionValue>::new().into_boxed_slice()));
                }
                (
                    OptionKey::dependent(&dimension.name, &parent_values),
                    parent_values,
                )
            }
        };

        let options = self
            .cache
            .get_or_fetch(&key, || async {
                let fetched = self.source.fetch_distinct(dimension, &parent_values).await?;
                Ok(Arc::from(fetched.into_boxed_slice()))
            })
            .await?;
        Ok(options)
    }

    /// Drop the cached list for one key.
    pub fn invalidate(&self, key: &OptionKey) {
        self.cache.invalidate(key);
    }

    /// Drop all cached lists.
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// The underlying cache.
    pub fn cache(&self) -> &C {
        &self.cache
    }
}
