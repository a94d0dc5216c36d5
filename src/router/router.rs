//! Router
//!
//! Presents many cache nodes as one cache: the hash ring picks the owner of
//! a key, the pool supplies a client for it, and the call is forwarded.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::ring::HashRing;
use crate::router::{ConnectionPool, Connector, NodeClient};

/// TTL substituted when a caller passes zero.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Deadline applied to each remote call unless configured otherwise.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Sharding front for a set of cache nodes.
///
/// Membership changes do not move data: keys whose owner changes read as
/// misses until they are written again.
#[derive(Debug)]
pub struct Router {
    ring: HashRing,
    pool: ConnectionPool,
    default_ttl: Duration,
    request_timeout: Duration,
}

impl Router {
    // == Constructor ==
    /// Builds a router over `nodes`, `replicas` ring points per node.
    pub fn new<I, S>(nodes: I, replicas: usize, connector: Arc<dyn Connector>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            ring: HashRing::with_nodes(replicas, nodes),
            pool: ConnectionPool::new(connector),
            default_ttl: DEFAULT_TTL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Builds a router from configuration.
    pub fn from_config(config: &Config, connector: Arc<dyn Connector>) -> Self {
        Self::new(&config.nodes, config.replicas, connector)
            .with_default_ttl(config.default_ttl())
            .with_request_timeout(config.request_timeout())
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        if !ttl.is_zero() {
            self.default_ttl = ttl;
        }
        self
    }

    /// Sets the per-call deadline. Expiry surfaces as [`CacheError::Timeout`].
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    // == Set ==
    /// Writes `value` on the node owning `key`. A zero `ttl` means the
    /// router's default TTL.
    pub async fn set(&self, key: &str, value: impl Into<Bytes>, ttl: Duration) -> Result<()> {
        let ttl = if ttl.is_zero() { self.default_ttl } else { ttl };
        let ttl_seconds = wire_ttl(ttl);
        let value = value.into();

        let (address, client) = self.route(key).await?;
        let reply = self
            .call(&address, client.set(key, value, ttl_seconds))
            .await?;

        if reply.success {
            Ok(())
        } else {
            Err(CacheError::Rejected(reply.message))
        }
    }

    // == Get ==
    /// Reads `key` from its owner. A miss is [`CacheError::NotFound`].
    pub async fn get(&self, key: &str) -> Result<Bytes> {
        let (address, client) = self.route(key).await?;

        self.call(&address, client.get(key))
            .await?
            .ok_or_else(|| CacheError::NotFound(key.to_string()))
    }

    // == Delete ==
    /// Deletes `key` on its owner. Absent keys are not an error.
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let (address, client) = self.route(key).await?;
        self.call(&address, client.delete(key)).await
    }

    /// Health status reported by `address`.
    pub async fn health(&self, address: &str) -> Result<String> {
        let client = self.pool.get_or_connect(address).await?;
        self.call(address, client.health()).await
    }

    // == Membership ==
    /// Adds `address` to the ring. Data is not moved onto it.
    pub fn add_node(&self, address: &str) {
        self.ring.add_node(address);
        info!(node = %address, "Added node");
    }

    /// Removes `address` from the ring and closes its pooled connection.
    pub fn remove_node(&self, address: &str) {
        self.ring.remove_node(address);
        self.pool.evict(address);
        info!(node = %address, "Removed node");
    }

    /// Addresses currently on the ring.
    pub fn nodes(&self) -> Vec<String> {
        self.ring.get_nodes()
    }

    /// Node that owns `key` right now, if any.
    pub fn node_for(&self, key: &str) -> Option<String> {
        self.ring.get_node(key)
    }

    /// Number of open pooled connections.
    pub fn pooled_connections(&self) -> usize {
        self.pool.len()
    }

    // == Close ==
    /// Closes every pooled connection. Idempotent; the router can still be
    /// used afterwards and will reconnect on demand.
    pub fn close(&self) {
        self.pool.close_all();
    }

    async fn route(&self, key: &str) -> Result<(String, Arc<dyn NodeClient>)> {
        let address = self.ring.get_node(key).ok_or(CacheError::NoNodesAvailable)?;
        let client = self.pool.get_or_connect(&address).await.map_err(|e| {
            warn!(node = %address, error = %e, "Failed to connect");
            e
        })?;
        Ok((address, client))
    }

    async fn call<T>(&self, address: &str, fut: impl Future<Output = Result<T>>) -> Result<T> {
        let result = match tokio::time::timeout(self.request_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout {
                node: address.to_string(),
            }),
        };

        if let Err(e) = &result {
            if e.is_transport() {
                warn!(node = %address, error = %e, "Remote call failed");
            }
        }
        result
    }
}

impl Drop for Router {
    fn drop(&mut self) {
        self.pool.close_all();
    }
}

/// Whole seconds for the wire: sub-second TTLs round up, huge ones clamp.
fn wire_ttl(ttl: Duration) -> i32 {
    let mut secs = ttl.as_secs();
    if ttl.subsec_nanos() > 0 {
        secs += 1;
    }
    i32::try_from(secs.max(1)).unwrap_or(i32::MAX)
}
