use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lru::LruCache;
use time::Date;
use tokio::sync::RwLock;

use crate::{FetchError, MealRecord, MealSource, date_key};

#[derive(Debug, Clone)]
struct CacheEntry {
    records: Vec<MealRecord>,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(records: Vec<MealRecord>, ttl: Duration) -> Self {
        Self {
            records,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Memoizes another [`MealSource`] by `YYYYMMDD` for a fixed time window.
///
/// Only successful answers are stored, including days with no rows. Errors
/// pass through so the next request asks upstream again.
#[derive(Clone)]
pub struct CachedMealSource<S> {
    inner: S,
    ttl: Duration,
    store: Arc<RwLock<LruCache<String, CacheEntry>>>,
}

impl<S: MealSource> CachedMealSource<S> {
    const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(64) {
        Some(n) => n,
        None => unreachable!(),
    };

    pub fn new(inner: S, ttl: Duration, max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(Self::DEFAULT_CAPACITY);

        Self {
            inner,
            ttl,
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    async fn cached(&self, key: &str) -> Option<Vec<MealRecord>> {
        let mut store = self.store.write().await;
        let entry = store.get(key)?;
        if !entry.is_expired() {
            return Some(entry.records.clone());
        }

        store.pop(key);
        None
    }
}

#[async_trait::async_trait]
impl<S: MealSource> MealSource for CachedMealSource<S> {
    async fn fetch_day(&self, date: Date) -> Result<Vec<MealRecord>, FetchError> {
        let key = date_key(date);

        if let Some(records) = self.cached(&key).await {
            tracing::debug!(key = %key, "meal cache hit");
            return Ok(records);
        }

        tracing::debug!(key = %key, "meal cache miss");
        let records = self.inner.fetch_day(date).await?;

        self.store
            .write()
            .await
            .push(key, CacheEntry::new(records.clone(), self.ttl));

        Ok(records)
    }
}
