//! In-memory memoization of search results.
//!
//! Entries are keyed by the normalized search criteria and expire after a
//! fixed time-to-live. Past capacity the least recently used entry is
//! evicted. The cache is never a source of truth: a miss always falls
//! through to the wrapped store.

pub mod store;

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use lru::LruCache;

use crate::Contact;
use crate::store::SearchQuery;

pub use store::CachedStore;

/// Default maximum number of cached searches.
pub const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(100) {
    Some(n) => n,
    None => unreachable!(),
};

/// Default lifetime of a cached search.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
struct CacheEntry {
    results: Vec<Contact>,
    stored_at: Instant,
}

/// TTL + LRU cache of search results.
///
/// Safe to share between tasks; the lock is never held across an await.
#[derive(Debug)]
pub struct SearchCache {
    entries: Mutex<LruCache<SearchQuery, CacheEntry>>,
    /// Bumped by every `clear`, only while `entries` is locked.
    generation: AtomicU64,
    ttl: Duration,
}

impl Default for SearchCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TTL)
    }
}

impl SearchCache {
    pub fn new(capacity: NonZeroUsize, ttl: Duration) -> Self {
        Self { entries: Mutex::new(LruCache::new(capacity)), generation: AtomicU64::new(0), ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    /// Number of entries currently held, expired ones included.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a fresh entry, marking it most recently used.
    ///
    /// Expired entries are dropped and reported as a miss.
    pub fn get(&self, query: &SearchQuery) -> Option<Vec<Contact>> {
        let mut entries = self.lock();
        match entries.get(query) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => return Some(entry.results.clone()),
            Some(_) => {}
            None => return None,
        }
        entries.pop(query);
        None
    }

    /// Number of times the cache has been cleared.
    ///
    /// Read it before querying storage and hand it to [`SearchCache::insert_since`].
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Store results read while the cache was at `generation`, evicting the
    /// least recently used entry if full.
    ///
    /// Returns `false` without storing anything if the cache has been cleared
    /// since, as the results may predate the write that caused the clear.
    pub fn insert_since(&self, generation: u64, query: SearchQuery, results: Vec<Contact>) -> bool {
        let mut entries = self.lock();
        if self.generation.load(Ordering::Acquire) != generation {
            tracing::trace!(?query, "cache cleared during search; dropping results");
            return false;
        }
        let entry = CacheEntry { results, stored_at: Instant::now() };
        if let Some((evicted, _)) = entries.push(query.clone(), entry)
            && evicted != query
        {
            tracing::trace!(?evicted, "evicted least recently used search");
        }
        true
    }

    /// Drop every entry.
    pub fn clear(&self) {
        let mut entries = self.lock();
        self.generation.fetch_add(1, Ordering::AcqRel);
        entries.clear();
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<SearchQuery, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
