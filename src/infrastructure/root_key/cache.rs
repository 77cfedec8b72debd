//! Read-through cache for root key lookups

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;

use crate::domain::root_key::{RootKey, RootKeyRepository};
use crate::domain::DomainError;

/// TTL-bounded read-through cache over a `RootKeyRepository`
///
/// Only hits are cached: misses always consult the inner store, so a freshly
/// seeded root key is visible immediately. Entries expire after the TTL,
/// which bounds how long a revoked key can keep authorizing requests.
#[derive(Debug)]
pub struct CachedRootKeyRepository<R>
where
    R: RootKeyRepository,
{
    inner: Arc<R>,
    cache: Cache<String, RootKey>,
}

impl<R: RootKeyRepository> CachedRootKeyRepository<R> {
    /// Create a new cache in front of `inner`
    pub fn new(inner: Arc<R>, ttl: Duration, capacity: u64) -> Self {
        let cache = Cache::builder()
            .time_to_live(ttl)
            .max_capacity(capacity)
            .build();

        Self { inner, cache }
    }

    /// Drop a cached entry, forcing the next lookup through to the store
    pub async fn invalidate(&self, hash: &str) {
        self.cache.invalidate(hash).await;
    }

    /// Number of currently cached entries
    pub fn cache_size(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[async_trait]
impl<R: RootKeyRepository> RootKeyRepository for CachedRootKeyRepository<R> {
    async fn find_by_hash(&self, hash: &str) -> Result<Option<RootKey>, DomainError> {
        if let Some(cached) = self.cache.get(hash).await {
            tracing::debug!(root_key_id = %cached.id(), "Root key cache hit");
            return Ok(Some(cached));
        }

        let found = self.inner.find_by_hash(hash).await?;

        if let Some(key) = &found {
            self.cache.insert(hash.to_string(), key.clone()).await;
        }

        Ok(found)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        self.inner.ping().await
    }
}
