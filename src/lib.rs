//! Shard Cache - a sharded in-memory key-value cache
//!
//! Cache nodes each hold a TTL-expiring store; a routing proxy maps keys to
//! nodes with consistent hashing and pools one connection per node.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod ring;
pub mod router;
pub mod service;
pub mod tasks;

pub use api::{AppState, ProxyState};
pub use config::{Config, Role};
pub use error::{CacheError, Result};
pub use ring::HashRing;
pub use router::Router;
pub use service::CacheService;
pub use tasks::spawn_cleanup_task;
