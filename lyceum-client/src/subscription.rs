//! Cache subscription handle.
//!
//! Pairs a cache registry subscription with its key so consumers can await
//! staleness and release cleanly. Releasing cancels future notification
//! only; an in-flight transport call still lands in the cache for whoever
//! subscribes next.

use lyceum_cache::{CacheRegistry, QueryKey, StaleSignal};
use std::sync::Arc;

/// A live subscription of one consumer to one cache entry.
pub struct QuerySubscription {
    cache: Arc<CacheRegistry>,
    key: QueryKey,
    signal: StaleSignal,
}

impl QuerySubscription {
    /// Subscribe to a key, creating its entry on first use.
    pub async fn start(cache: Arc<CacheRegistry>, key: QueryKey) -> Self {
        let signal = cache.subscribe(&key).await;
        Self { cache, key, signal }
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// Wait for the subscribed entry to be invalidated.
    ///
    /// Returns `false` once the entry is gone and no further notifications
    /// will arrive.
    pub async fn invalidated(&mut self) -> bool {
        self.signal.invalidated().await
    }

    /// End the subscription, decrementing the entry's subscriber count.
    pub async fn release(self) {
        self.cache.unsubscribe(&self.key).await;
    }
}
