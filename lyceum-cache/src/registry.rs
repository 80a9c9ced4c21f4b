//! The cache registry: tag index, staleness, in-flight deduplication.
//!
//! All state lives behind one async write lock and every transition is a
//! single critical section; the lock is never held across an await point,
//! so re-entrant invalidation (a refetch triggered by one invalidation
//! racing another mutation) cannot deadlock.

use crate::entry::{CacheEntry, CacheSnapshot};
use crate::key::QueryKey;
use chrono::Utc;
use lyceum_core::{CacheError, Tag};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{watch, RwLock};
use tracing::debug;

/// Statistics about cache usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of fresh lookups served from the cache.
    pub hits: u64,
    /// Number of lookups that found no fresh entry.
    pub misses: u64,
    /// Number of entries marked stale by invalidations.
    pub invalidations: u64,
    /// Number of entries removed by retention sweeps.
    pub evictions: u64,
    /// Number of entries currently in the registry.
    pub entry_count: u64,
}

impl CacheStats {
    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Outcome of an invalidation pass.
#[derive(Debug, Default)]
pub struct InvalidationReport {
    /// Every key marked stale by this invalidation.
    pub stale: Vec<QueryKey>,
    /// The subset with at least one live subscriber, due an eager refetch.
    pub active: Vec<QueryKey>,
}

/// Role handed to a caller that wants to fetch a key.
///
/// The first caller becomes the leader and performs the transport call;
/// concurrent callers for the same key join as followers and await the
/// leader's result instead of issuing a redundant request.
pub enum FetchRole {
    Leader,
    Follower(watch::Receiver<Option<Result<Value, String>>>),
}

/// Staleness signal held by an active subscriber.
///
/// Fires whenever the subscribed entry is marked stale; dropping the signal
/// (unsubscribing) silently cancels further notification.
#[derive(Debug)]
pub struct StaleSignal {
    rx: watch::Receiver<u64>,
}

impl StaleSignal {
    /// Wait until the entry is invalidated again.
    ///
    /// Returns `false` if the registry dropped the entry, which also ends
    /// the subscription.
    pub async fn invalidated(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

struct Slot {
    entry: CacheEntry,
    stale_tx: watch::Sender<u64>,
    stale_generation: u64,
}

impl Slot {
    fn new() -> Self {
        let (stale_tx, _) = watch::channel(0);
        Self {
            entry: CacheEntry::empty(),
            stale_tx,
            stale_generation: 0,
        }
    }
}

#[derive(Default)]
struct RegistryState {
    entries: HashMap<QueryKey, Slot>,
    by_tag: HashMap<Tag, HashSet<QueryKey>>,
    inflight: HashMap<QueryKey, watch::Sender<Option<Result<Value, String>>>>,
}

/// The addressable map from tags to the queries that depend on them.
#[derive(Default)]
pub struct CacheRegistry {
    state: RwLock<RegistryState>,
    hits: AtomicU64,
    misses: AtomicU64,
    invalidations: AtomicU64,
    evictions: AtomicU64,
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber for a key, creating the entry on first use.
    ///
    /// The returned signal fires on every subsequent invalidation of the
    /// entry while the subscription is held.
    pub async fn subscribe(&self, key: &QueryKey) -> StaleSignal {
        let mut state = self.state.write().await;
        let slot = state
            .entries
            .entry(key.clone())
            .or_insert_with(Slot::new);
        slot.entry.subscribers += 1;
        StaleSignal {
            rx: slot.stale_tx.subscribe(),
        }
    }

    /// Release one subscriber. The entry itself stays until the next sweep,
    /// so an in-flight response still has a slot to land in.
    pub async fn unsubscribe(&self, key: &QueryKey) {
        let mut state = self.state.write().await;
        if let Some(slot) = state.entries.get_mut(key) {
            slot.entry.subscribers = slot.entry.subscribers.saturating_sub(1);
        }
    }

    /// Look up a key, counting a hit only for fresh data.
    pub async fn lookup(&self, key: &QueryKey) -> Option<CacheSnapshot> {
        let state = self.state.read().await;
        let snapshot = state.entries.get(key).and_then(|slot| {
            let value = slot.entry.value.clone()?;
            Some(CacheSnapshot {
                value,
                fresh: slot.entry.fresh,
                fetched_at: slot.entry.fetched_at.unwrap_or_else(Utc::now),
            })
        });
        match &snapshot {
            Some(snap) if snap.fresh => self.hits.fetch_add(1, Ordering::Relaxed),
            _ => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        snapshot
    }

    /// Apply a response as one atomic state transition.
    ///
    /// Upserts the entry (a late response may arrive after eviction or
    /// before any subscription), replaces its provided-tag links and marks
    /// it fresh. Partial application is impossible: readers either see the
    /// previous state or the full new one.
    pub async fn apply_response(&self, key: &QueryKey, provides: &[Tag], value: Value) {
        let mut state = self.state.write().await;

        // Unlink tags from the previous response first.
        let old_tags: Vec<Tag> = state
            .entries
            .get(key)
            .map(|slot| slot.entry.provides.iter().cloned().collect())
            .unwrap_or_default();
        for tag in old_tags {
            if let Some(keys) = state.by_tag.get_mut(&tag) {
                keys.remove(key);
                if keys.is_empty() {
                    state.by_tag.remove(&tag);
                }
            }
        }

        for tag in provides {
            state
                .by_tag
                .entry(tag.clone())
                .or_default()
                .insert(key.clone());
        }

        let slot = state
            .entries
            .entry(key.clone())
            .or_insert_with(Slot::new);
        slot.entry.value = Some(value);
        slot.entry.fetched_at = Some(Utc::now());
        slot.entry.fresh = true;
        slot.entry.provides = provides.iter().cloned().collect();
    }

    /// Mark every entry overlapping the invalidated tag set as stale.
    ///
    /// Tags are unioned: an entry providing any one of them goes stale.
    /// Staleness is visible to all readers before this call returns.
    pub async fn invalidate(&self, tags: &[Tag]) -> InvalidationReport {
        let mut state = self.state.write().await;
        let mut affected: HashSet<QueryKey> = HashSet::new();
        for tag in tags {
            if let Some(keys) = state.by_tag.get(tag) {
                affected.extend(keys.iter().cloned());
            }
        }

        let mut report = InvalidationReport::default();
        for key in affected {
            if let Some(slot) = state.entries.get_mut(&key) {
                slot.entry.fresh = false;
                slot.stale_generation += 1;
                // Subscribers that are gone just see a closed channel.
                let _ = slot.stale_tx.send(slot.stale_generation);
                if slot.entry.subscribers > 0 {
                    report.active.push(key.clone());
                }
                report.stale.push(key);
            }
        }

        self.invalidations
            .fetch_add(report.stale.len() as u64, Ordering::Relaxed);
        debug!(
            tags = tags.len(),
            stale = report.stale.len(),
            active = report.active.len(),
            "invalidated cache entries"
        );
        report
    }

    /// Claim the fetch for a key, deduplicating concurrent identical
    /// queries into one in-flight request.
    pub async fn begin_fetch(&self, key: &QueryKey) -> FetchRole {
        let mut state = self.state.write().await;
        if let Some(tx) = state.inflight.get(key) {
            return FetchRole::Follower(tx.subscribe());
        }
        let (tx, _) = watch::channel(None);
        state.inflight.insert(key.clone(), tx);
        FetchRole::Leader
    }

    /// Publish the leader's outcome to all followers and release the slot.
    pub async fn complete_fetch(&self, key: &QueryKey, result: Result<Value, String>) {
        let mut state = self.state.write().await;
        if let Some(tx) = state.inflight.remove(key) {
            let _ = tx.send(Some(result));
        }
    }

    /// Await the leader's result from a follower position.
    pub async fn wait_for_leader(
        mut rx: watch::Receiver<Option<Result<Value, String>>>,
        key: &QueryKey,
    ) -> Result<Result<Value, String>, CacheError> {
        loop {
            let current = rx.borrow().clone();
            if let Some(result) = current {
                return Ok(result);
            }
            if rx.changed().await.is_err() {
                return Err(CacheError::FetchAbandoned {
                    key: key.to_string(),
                });
            }
        }
    }

    /// Retention sweep: evict entries whose subscriber count is zero.
    pub async fn sweep(&self) -> usize {
        let mut state = self.state.write().await;
        let idle: Vec<QueryKey> = state
            .entries
            .iter()
            .filter(|(_, slot)| slot.entry.subscribers == 0)
            .map(|(key, _)| key.clone())
            .collect();

        for key in &idle {
            if let Some(slot) = state.entries.remove(key) {
                for tag in slot.entry.provides {
                    if let Some(keys) = state.by_tag.get_mut(&tag) {
                        keys.remove(key);
                        if keys.is_empty() {
                            state.by_tag.remove(&tag);
                        }
                    }
                }
            }
        }

        self.evictions
            .fetch_add(idle.len() as u64, Ordering::Relaxed);
        idle.len()
    }

    /// Current subscriber count of a key, if it has an entry.
    pub async fn subscriber_count(&self, key: &QueryKey) -> Option<usize> {
        let state = self.state.read().await;
        state.entries.get(key).map(|slot| slot.entry.subscribers)
    }

    pub async fn stats(&self) -> CacheStats {
        let state = self.state.read().await;
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            entry_count: state.entries.len() as u64,
        }
    }
}
