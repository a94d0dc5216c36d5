//! Response DTOs for the node and proxy APIs
//!
//! Defines the structure of HTTP response bodies.

use serde::{Deserialize, Serialize};

use crate::cache::StatsSnapshot;

/// Response body for the GET operation (GET /get/:key)
///
/// `value` is meaningless when `found` is false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetResponse {
    pub found: bool,
    #[serde(with = "super::base64_bytes", default)]
    pub value: Vec<u8>,
}

impl GetResponse {
    pub fn found(value: impl Into<Vec<u8>>) -> Self {
        Self {
            found: true,
            value: value.into(),
        }
    }

    pub fn missing() -> Self {
        Self {
            found: false,
            value: Vec::new(),
        }
    }
}

/// Response body for the SET operation (PUT /set)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetResponse {
    pub success: bool,
    /// "stored" or the reason the write was refused
    pub message: String,
}

impl SetResponse {
    pub fn stored() -> Self {
        Self {
            success: true,
            message: "stored".to_string(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Response body for the DELETE operation (DELETE /del/:key)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    pub sets: u64,
    pub deletes: u64,
    /// Entries removed by the active sweep
    pub expired: u64,
    /// Current number of entries in the store
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(stats: StatsSnapshot, total_entries: usize) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            sets: stats.sets,
            deletes: stats.deletes,
            expired: stats.expired,
            total_entries,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Response body for the proxy membership endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodesResponse {
    pub nodes: Vec<String>,
}
