//! Router Module
//!
//! Routes Get/Set/Delete to the node owning each key and keeps one pooled
//! client per node.

mod client;
mod local;
mod pool;
#[allow(clippy::module_inception)]
mod router;

pub use client::{Connector, HttpConnector, HttpNodeClient, NodeClient};
pub use local::{LocalConnector, LocalNodeClient};
pub use pool::ConnectionPool;
pub use router::{Router, DEFAULT_REQUEST_TIMEOUT, DEFAULT_TTL};
