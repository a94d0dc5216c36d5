//! Cache Service
//!
//! The node-side request contract over a [`TtlStore`]: validation, default
//! TTL substitution and traffic counters. HTTP handlers and in-process
//! clients both go through here.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::debug;

use crate::cache::{CacheStats, Clock, TtlStore};
use crate::config::Config;
use crate::models::{
    DeleteResponse, GetResponse, HealthResponse, SetRequest, SetResponse, StatsResponse,
};

/// One node's cache plus its policy. Cheap to clone.
#[derive(Debug, Clone)]
pub struct CacheService {
    /// Thread-safe TTL store
    pub store: Arc<TtlStore>,
    /// Traffic counters
    pub stats: Arc<CacheStats>,
    /// Applied when a Set arrives with `ttl_seconds == 0`
    default_ttl: Duration,
}

impl CacheService {
    pub fn new(store: TtlStore, default_ttl: Duration) -> Self {
        Self {
            store: Arc::new(store),
            stats: Arc::new(CacheStats::new()),
            default_ttl,
        }
    }

    /// Creates a service from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(TtlStore::new(), config.default_ttl())
    }

    /// Creates a service whose store runs on `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>, default_ttl: Duration) -> Self {
        Self::new(TtlStore::with_clock(clock), default_ttl)
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Stores a value. Bad input yields `success = false`, not an error.
    pub fn set(&self, req: SetRequest) -> SetResponse {
        if let Some(reason) = req.validate() {
            return SetResponse::rejected(reason);
        }

        let ttl = match req.ttl_seconds {
            0 => self.default_ttl,
            secs => Duration::from_secs(secs.unsigned_abs().into()),
        };

        match self.store.set(req.key, req.value, ttl) {
            Ok(()) => {
                self.stats.record_set();
                SetResponse::stored()
            }
            Err(e) => SetResponse::rejected(e.to_string()),
        }
    }

    pub fn get(&self, key: &str) -> GetResponse {
        match self.store.get(key) {
            Some(value) => {
                self.stats.record_hit();
                GetResponse::found(value.to_vec())
            }
            None => {
                self.stats.record_miss();
                GetResponse::missing()
            }
        }
    }

    /// Reads a value without the DTO wrapping.
    pub fn get_bytes(&self, key: &str) -> Option<Bytes> {
        let value = self.store.get(key);
        if value.is_some() {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }
        value
    }

    /// Always succeeds, present or not.
    pub fn delete(&self, key: &str) -> DeleteResponse {
        self.store.delete(key);
        self.stats.record_delete();
        DeleteResponse { success: true }
    }

    pub fn health(&self) -> HealthResponse {
        HealthResponse::healthy()
    }

    pub fn stats(&self) -> StatsResponse {
        StatsResponse::new(self.stats.snapshot(), self.store.len())
    }

    /// Runs one active sweep and records the result.
    pub fn sweep(&self) -> usize {
        let removed = self.store.cleanup_expired();
        self.stats.record_expired(removed);
        debug!(removed, "Swept expired entries");
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    const DAY: Duration = Duration::from_secs(86_400);

    fn manual_service() -> (Arc<ManualClock>, CacheService) {
        let clock = Arc::new(ManualClock::new(0));
        let service = CacheService::with_clock(clock.clone(), DAY);
        (clock, service)
    }

    #[test]
    fn test_set_and_get() {
        let (_, service) = manual_service();

        let resp = service.set(SetRequest::new("k", "v", 60));
        assert_eq!(resp, SetResponse::stored());
        assert_eq!(service.get("k"), GetResponse::found(b"v".to_vec()));
    }

    #[test]
    fn test_empty_key_rejected_without_mutation() {
        let (_, service) = manual_service();

        let resp = service.set(SetRequest::new("", "v", 60));
        assert!(!resp.success);
        assert_eq!(resp.message, "key cannot be empty");
        assert!(service.store.is_empty());
        assert_eq!(service.stats().sets, 0);
    }

    #[test]
    fn test_zero_ttl_uses_default() {
        let (clock, service) = manual_service();

        service.set(SetRequest::new("k", "v", 0));
        clock.advance(DAY - Duration::from_secs(1));
        assert!(service.get("k").found);

        clock.advance(Duration::from_secs(1));
        assert!(!service.get("k").found);
    }

    #[test]
    fn test_negative_ttl_rejected() {
        let (_, service) = manual_service();

        let resp = service.set(SetRequest::new("k", "v", -5));
        assert!(!resp.success);
        assert!(service.store.is_empty());
    }

    #[test]
    fn test_delete_always_succeeds() {
        let (_, service) = manual_service();

        assert!(service.delete("missing").success);
        assert!(service.delete("missing").success);
        assert_eq!(service.stats().deletes, 2);
    }

    #[test]
    fn test_sweep_counts_expired() {
        let (clock, service) = manual_service();

        service.set(SetRequest::new("a", "1", 1));
        service.set(SetRequest::new("b", "2", 100));
        clock.advance(Duration::from_secs(2));

        assert_eq!(service.sweep(), 1);
        let stats = service.stats();
        assert_eq!(stats.expired, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[test]
    fn test_hit_miss_counters() {
        let (_, service) = manual_service();

        service.set(SetRequest::new("k", "v", 60));
        service.get("k");
        service.get_bytes("k");
        service.get("nope");

        let stats = service.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_health() {
        let (_, service) = manual_service();
        assert_eq!(service.health().status, "healthy");
    }
}
