//! LYCEUM Cache - Tag-Indexed Query Cache
//!
//! Maintains the tag to query-key index relating cached reads to the
//! mutations that invalidate them. Queries declare the tags they provide,
//! mutations declare the tags they invalidate; every overlapping entry is
//! marked stale in one atomic state transition.
//!
//! # Refetch policy
//!
//! Invalidation itself never issues transport calls. Entries with at least
//! one live subscriber are reported back for immediate refetch and their
//! staleness signal fires; idle entries stay stale until the next access.

pub mod entry;
pub mod key;
pub mod registry;

pub use entry::{CacheEntry, CacheSnapshot};
pub use key::QueryKey;
pub use registry::{
    CacheRegistry, CacheStats, FetchRole, InvalidationReport, StaleSignal,
};
