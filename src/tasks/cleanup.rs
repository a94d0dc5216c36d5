//! TTL Cleanup Task
//!
//! Background task that periodically sweeps expired entries from a node's store.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::service::CacheService;

/// Spawns a background task that runs the active sweep every `interval`.
///
/// Reads already hide expired entries; the sweep only bounds memory held by
/// keys that are written once and never read again.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let service = CacheService::new(TtlStore::new(), Duration::from_secs(86_400));
/// let cleanup_handle = spawn_cleanup_task(service.clone(), Duration::from_secs(5));
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(service: CacheService, interval: Duration) -> JoinHandle<()> {
    // tokio::time::interval panics on a zero period
    let interval = interval.max(Duration::from_millis(10));

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} ms",
            interval.as_millis()
        );

        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let removed = service.sweep();

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
