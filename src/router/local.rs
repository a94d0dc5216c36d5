//! In-Process Nodes
//!
//! A [`Connector`] whose nodes are [`CacheService`]s living in this process.
//! Used to run the router without a network, and in tests to observe pool
//! behavior, inject latency and take nodes down.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use parking_lot::RwLock;

use crate::cache::{Clock, SystemClock};
use crate::error::{CacheError, Result};
use crate::models::{SetRequest, SetResponse};
use crate::router::{Connector, NodeClient};
use crate::service::CacheService;

/// Hands out clients backed by per-address in-process services.
///
/// Clones share the same nodes.
#[derive(Debug, Clone)]
pub struct LocalConnector {
    inner: Arc<LocalNodes>,
}

#[derive(Debug)]
struct LocalNodes {
    services: DashMap<String, CacheService>,
    clock: Arc<dyn Clock>,
    default_ttl: Duration,
    connects: AtomicUsize,
    down: RwLock<HashSet<String>>,
    latency: RwLock<Duration>,
}

impl Default for LocalConnector {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl LocalConnector {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(LocalNodes {
                services: DashMap::new(),
                clock,
                default_ttl: Duration::from_secs(86_400),
                connects: AtomicUsize::new(0),
                down: RwLock::new(HashSet::new()),
                latency: RwLock::new(Duration::ZERO),
            }),
        }
    }

    /// The service behind `address`, created on first use.
    pub fn service(&self, address: &str) -> CacheService {
        let nodes = &self.inner;
        nodes
            .services
            .entry(address.to_string())
            .or_insert_with(|| CacheService::with_clock(nodes.clock.clone(), nodes.default_ttl))
            .clone()
    }

    /// How many times `connect` has succeeded.
    pub fn connect_count(&self) -> usize {
        self.inner.connects.load(Ordering::SeqCst)
    }

    /// Makes `address` refuse new connections and fail in-flight calls.
    pub fn set_down(&self, address: &str, down: bool) {
        let mut set = self.inner.down.write();
        if down {
            set.insert(address.to_string());
        } else {
            set.remove(address);
        }
    }

    /// Delay added to every call.
    pub fn set_latency(&self, latency: Duration) {
        *self.inner.latency.write() = latency;
    }
}

impl LocalNodes {
    fn is_down(&self, address: &str) -> bool {
        self.down.read().contains(address)
    }
}

#[async_trait]
impl Connector for LocalConnector {
    async fn connect(&self, address: &str) -> Result<Arc<dyn NodeClient>> {
        if self.inner.is_down(address) {
            return Err(CacheError::transport(address, "connection refused"));
        }

        self.inner.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(LocalNodeClient {
            address: address.to_string(),
            service: self.service(address),
            nodes: self.inner.clone(),
            closed: AtomicBool::new(false),
        }))
    }
}

/// Client for one in-process node.
#[derive(Debug)]
pub struct LocalNodeClient {
    address: String,
    service: CacheService,
    nodes: Arc<LocalNodes>,
    closed: AtomicBool,
}

impl LocalNodeClient {
    async fn round_trip(&self) -> Result<()> {
        let latency = *self.nodes.latency.read();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if self.closed.load(Ordering::Acquire) {
            return Err(CacheError::transport(&self.address, "connection closed"));
        }
        if self.nodes.is_down(&self.address) {
            return Err(CacheError::transport(&self.address, "connection reset"));
        }
        Ok(())
    }
}

#[async_trait]
impl NodeClient for LocalNodeClient {
    async fn set(&self, key: &str, value: Bytes, ttl_seconds: i32) -> Result<SetResponse> {
        self.round_trip().await?;
        Ok(self
            .service
            .set(SetRequest::new(key, value.to_vec(), ttl_seconds)))
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        self.round_trip().await?;
        Ok(self.service.get_bytes(key))
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        self.round_trip().await?;
        Ok(self.service.delete(key).success)
    }

    async fn health(&self) -> Result<String> {
        self.round_trip().await?;
        Ok(self.service.health().status)
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}
