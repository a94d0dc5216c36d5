//! Node Clients
//!
//! The remote-call seam between the router and cache nodes, plus the
//! reqwest-backed implementation that speaks the node HTTP API.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::models::{DeleteResponse, GetResponse, HealthResponse, SetRequest, SetResponse};

/// Handle to one cache node.
#[async_trait]
pub trait NodeClient: Send + Sync + std::fmt::Debug {
    /// Stores a value. A refused write comes back as `success = false`.
    async fn set(&self, key: &str, value: Bytes, ttl_seconds: i32) -> Result<SetResponse>;

    /// Reads a value, `None` on a miss.
    async fn get(&self, key: &str) -> Result<Option<Bytes>>;

    async fn delete(&self, key: &str) -> Result<bool>;

    async fn health(&self) -> Result<String>;

    /// Releases the handle. Later calls fail with a transport error.
    fn close(&self);
}

/// Opens handles to nodes for the connection pool.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, address: &str) -> Result<Arc<dyn NodeClient>>;
}

// == HTTP Connector ==
/// Builds [`HttpNodeClient`]s.
#[derive(Debug, Clone)]
pub struct HttpConnector {
    connect_timeout: Duration,
}

impl HttpConnector {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

impl Default for HttpConnector {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

#[async_trait]
impl Connector for HttpConnector {
    async fn connect(&self, address: &str) -> Result<Arc<dyn NodeClient>> {
        let client = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .pool_max_idle_per_host(32)
            .no_proxy()
            .build()
            .map_err(|e| CacheError::transport(address, e))?;

        debug!(node = %address, "Opened HTTP client");
        Ok(Arc::new(HttpNodeClient::new(address, client)))
    }
}

// == HTTP Node Client ==
/// Talks to one node's HTTP API.
#[derive(Debug)]
pub struct HttpNodeClient {
    address: String,
    base_url: String,
    client: reqwest::Client,
    closed: AtomicBool,
}

impl HttpNodeClient {
    pub fn new(address: impl Into<String>, client: reqwest::Client) -> Self {
        let address = address.into();
        Self {
            base_url: base_url(&address),
            address,
            client,
            closed: AtomicBool::new(false),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn key_url(&self, route: &str, key: &str) -> String {
        self.url(&format!("{}/{}", route, urlencoding::encode(key)))
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(CacheError::transport(&self.address, "connection closed"));
        }
        Ok(())
    }

    fn classify(&self, err: reqwest::Error) -> CacheError {
        if err.is_timeout() {
            CacheError::Timeout {
                node: self.address.clone(),
            }
        } else {
            CacheError::transport(&self.address, err)
        }
    }

    fn unexpected(&self, status: StatusCode) -> CacheError {
        CacheError::transport(&self.address, format!("unexpected status {}", status))
    }
}

#[async_trait]
impl NodeClient for HttpNodeClient {
    async fn set(&self, key: &str, value: Bytes, ttl_seconds: i32) -> Result<SetResponse> {
        self.ensure_open()?;

        let request = SetRequest::new(key, value.to_vec(), ttl_seconds);
        let response = self
            .client
            .put(self.url("/set"))
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        match response.status() {
            StatusCode::OK | StatusCode::BAD_REQUEST => {
                response.json().await.map_err(|e| self.classify(e))
            }
            status => Err(self.unexpected(status)),
        }
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        self.ensure_open()?;
        // Nothing is ever stored under an empty key, and it has no path form.
        if key.is_empty() {
            return Ok(None);
        }

        let response = self
            .client
            .get(self.key_url("/get", key))
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        match response.status() {
            StatusCode::OK | StatusCode::NOT_FOUND => {
                let body: GetResponse = response.json().await.map_err(|e| self.classify(e))?;
                Ok(body.found.then(|| Bytes::from(body.value)))
            }
            status => Err(self.unexpected(status)),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        self.ensure_open()?;
        if key.is_empty() {
            return Ok(true);
        }

        let response = self
            .client
            .delete(self.key_url("/del", key))
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if response.status() != StatusCode::OK {
            return Err(self.unexpected(response.status()));
        }
        let body: DeleteResponse = response.json().await.map_err(|e| self.classify(e))?;
        Ok(body.success)
    }

    async fn health(&self) -> Result<String> {
        self.ensure_open()?;

        let response = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if response.status() != StatusCode::OK {
            return Err(self.unexpected(response.status()));
        }
        let body: HealthResponse = response.json().await.map_err(|e| self.classify(e))?;
        Ok(body.status)
    }

    fn close(&self) {
        // Idle sockets go when the last clone of the reqwest client drops.
        self.closed.store(true, Ordering::Release);
    }
}

/// `host:port` becomes `http://host:port`; explicit schemes are kept.
fn base_url(address: &str) -> String {
    let trimmed = address.trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}
