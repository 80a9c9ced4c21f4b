//! Cache entry state.

use lyceum_core::{Tag, Timestamp};
use serde_json::Value;
use std::collections::HashSet;

/// One cached query result with its freshness metadata.
///
/// Created on first subscription (before any data arrives), refreshed when
/// an overlapping tag is invalidated, evicted by the retention sweep once
/// its subscriber count reaches zero.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub(crate) value: Option<Value>,
    pub(crate) fetched_at: Option<Timestamp>,
    pub(crate) fresh: bool,
    pub(crate) subscribers: usize,
    pub(crate) provides: HashSet<Tag>,
}

impl CacheEntry {
    pub(crate) fn empty() -> Self {
        Self {
            value: None,
            fetched_at: None,
            fresh: false,
            subscribers: 0,
            provides: HashSet::new(),
        }
    }

    pub fn subscribers(&self) -> usize {
        self.subscribers
    }

    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    pub fn provides(&self) -> &HashSet<Tag> {
        &self.provides
    }
}

/// Read-only view of an entry handed to callers.
#[derive(Debug, Clone)]
pub struct CacheSnapshot {
    pub value: Value,
    pub fresh: bool,
    pub fetched_at: Timestamp,
}
