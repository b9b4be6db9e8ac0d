//! A `ContactStore` decorator that memoizes searches.
//!
//! Writes are forwarded unchanged. By default they do not invalidate cached
//! searches, so a deleted or edited contact may still be returned until its
//! entry expires; `invalidate_on_write` opts into clearing the cache after
//! every successful write. A search that overlaps such a clear returns its
//! results but does not cache them.

use async_trait::async_trait;

use super::SearchCache;
use crate::store::{ContactStore, SearchQuery};
use crate::{AppConfig, Contact, ContactUpdate};

/// Search-caching wrapper around any [`ContactStore`].
pub struct CachedStore<S> {
    inner: S,
    cache: SearchCache,
    invalidate_on_write: bool,
}

impl<S: ContactStore> CachedStore<S> {
    pub fn new(inner: S, cache: SearchCache) -> Self {
        Self { inner, cache, invalidate_on_write: false }
    }

    /// Build the wrapper with capacity, TTL and invalidation from configuration.
    pub fn from_config(inner: S, config: &AppConfig) -> Self {
        Self::new(inner, SearchCache::new(config.cache_capacity(), config.cache_ttl()))
            .invalidate_on_write(config.invalidate_cache_on_write)
    }

    /// Clear cached searches after each successful write.
    pub fn invalidate_on_write(mut self, enabled: bool) -> Self {
        self.invalidate_on_write = enabled;
        self
    }

    pub fn cache(&self) -> &SearchCache {
        &self.cache
    }

    fn after_write(&self, succeeded: bool) {
        if succeeded && self.invalidate_on_write {
            tracing::debug!("write succeeded; clearing search cache");
            self.cache.clear();
        }
    }
}

#[async_trait]
impl<S: ContactStore> ContactStore for CachedStore<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn add_entry(&self, contact: Contact) -> bool {
        let added = self.inner.add_entry(contact).await;
        self.after_write(added);
        added
    }

    async fn remove_entry(&self, email: &str) -> Option<u64> {
        let removed = self.inner.remove_entry(email).await;
        self.after_write(removed.is_some_and(|n| n > 0));
        removed
    }

    async fn update_entry(&self, email: &str, update: ContactUpdate) -> Option<u64> {
        let updated = self.inner.update_entry(email, update).await;
        self.after_write(updated.is_some_and(|n| n > 0));
        updated
    }

    async fn search_entry(&self, name: Option<&str>, email: Option<&str>) -> Option<Vec<Contact>> {
        let query = SearchQuery::new(name, email);
        if query.is_absent() {
            return None;
        }

        if let Some(hit) = self.cache.get(&query) {
            tracing::debug!(?query, "search cache hit");
            return Some(hit);
        }

        let generation = self.cache.generation();
        let results = self
            .inner
            .search_entry(query.name.as_deref(), query.email.as_deref())
            .await?;
        self.cache.insert_since(generation, query, results.clone());
        Some(results)
    }

    async fn close(&self) {
        self.inner.close().await;
    }
}
