//! Cache Module
//!
//! The per-node TTL store: lazy expiry on read plus an externally driven sweep.

mod clock;
mod entry;
mod stats;
mod store;


// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use stats::{CacheStats, StatsSnapshot};
pub use store::TtlStore;
