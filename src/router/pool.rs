//! Connection Pool
//!
//! Lazily opened, cached node clients keyed by address.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::error::Result;
use crate::router::{Connector, NodeClient};

/// At most one live client per address.
///
/// Connecting happens outside the lock; the write lock is only taken to
/// publish a new client, after re-checking that no other caller won the race.
pub struct ConnectionPool {
    connector: Arc<dyn Connector>,
    clients: RwLock<HashMap<String, Arc<dyn NodeClient>>>,
}

impl ConnectionPool {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self {
            connector,
            clients: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the pooled client for `address`, connecting on first use.
    pub async fn get_or_connect(&self, address: &str) -> Result<Arc<dyn NodeClient>> {
        let cached = self.clients.read().get(address).cloned();
        if let Some(client) = cached {
            return Ok(client);
        }

        let fresh = self.connector.connect(address).await?;

        let mut clients = self.clients.write();
        if let Some(existing) = clients.get(address) {
            // Lost the race, keep the published client.
            fresh.close();
            return Ok(existing.clone());
        }

        debug!(node = %address, "Pooled new connection");
        clients.insert(address.to_string(), fresh.clone());
        Ok(fresh)
    }

    /// Closes and forgets the client for `address`. Returns whether one existed.
    pub fn evict(&self, address: &str) -> bool {
        let removed = self.clients.write().remove(address);
        match removed {
            Some(client) => {
                client.close();
                debug!(node = %address, "Closed pooled connection");
                true
            }
            None => false,
        }
    }

    /// Closes every client and empties the pool. Safe to call repeatedly.
    pub fn close_all(&self) {
        let drained: Vec<_> = self.clients.write().drain().collect();
        for (_, client) in drained {
            client.close();
        }
    }

    pub fn contains(&self, address: &str) -> bool {
        self.clients.read().contains_key(address)
    }

    pub fn len(&self) -> usize {
        self.clients.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.read().is_empty()
    }

    /// Addresses with a live pooled client, sorted.
    pub fn addresses(&self) -> Vec<String> {
        let mut addresses: Vec<_> = self.clients.read().keys().cloned().collect();
        addresses.sort();
        addresses
    }
}

impl std::fmt::Debug for ConnectionPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionPool")
            .field("addresses", &self.addresses())
            .finish()
    }
}
