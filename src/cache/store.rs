//! TTL Store Module
//!
//! Per-node cache engine: a sharded concurrent map of keys to expiring entries.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use dashmap::DashMap;

use crate::cache::{CacheEntry, Clock, SystemClock};
use crate::error::{CacheError, Result};

// == TTL Store ==
/// Concurrent key/value storage with per-key absolute expiry.
///
/// Expired entries are dropped lazily on read and in bulk by
/// [`TtlStore::cleanup_expired`], which the hosting process runs on a timer.
/// There is no size bound or eviction beyond TTL.
#[derive(Debug)]
pub struct TtlStore {
    /// Key-value storage, locked per shard
    entries: DashMap<String, CacheEntry>,
    /// Time source for expiry
    clock: Arc<dyn Clock>,
}

impl Default for TtlStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TtlStore {
    // == Constructor ==
    /// Creates an empty store on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store on the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
        }
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl`, replacing any existing entry.
    ///
    /// A zero TTL is rejected; callers substitute their own default first.
    /// Sub-millisecond TTLs round up to one millisecond.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Bytes>, ttl: Duration) -> Result<()> {
        if ttl.is_zero() {
            return Err(CacheError::InvalidRequest(
                "TTL must be greater than zero".to_string(),
            ));
        }

        let ttl_ms = u64::try_from(ttl.as_nanos().div_ceil(1_000_000)).unwrap_or(u64::MAX);
        let entry = CacheEntry::new(value.into(), self.clock.now_ms(), ttl_ms);
        self.entries.insert(key.into(), entry);

        Ok(())
    }

    // == Get ==
    /// Returns the live value for `key`, if any.
    ///
    /// An expired entry reads as absent and is removed on the spot.
    pub fn get(&self, key: &str) -> Option<Bytes> {
        let now = self.clock.now_ms();

        {
            let entry = self.entries.get(key)?;
            if !entry.is_expired_at(now) {
                return Some(entry.value.clone());
            }
        }

        // Shard guard released above; only drop the entry if it is still the
        // expired one, a concurrent Set may have replaced it.
        self.entries.remove_if(key, |_, entry| entry.is_expired_at(now));
        None
    }

    // == Delete ==
    /// Removes `key`. Returns whether an entry was present.
    pub fn delete(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&self) -> usize {
        let now = self.clock.now_ms();
        let mut removed = 0;

        self.entries.retain(|_, entry| {
            let keep = !entry.is_expired_at(now);
            if !keep {
                removed += 1;
            }
            keep
        });

        removed
    }

    // == Length ==
    /// Returns the number of stored entries, expired ones included until swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
