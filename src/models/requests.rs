//! Request DTOs for the node and proxy APIs
//!
//! Defines the structure of HTTP request bodies. Byte values travel as base64.

use serde::{Deserialize, Serialize};

/// Request body for the SET operation (PUT /set)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    #[serde(with = "super::base64_bytes")]
    pub value: Vec<u8>,
    /// TTL in seconds; 0 means "use the default"
    #[serde(default)]
    pub ttl_seconds: i32,
}

impl SetRequest {
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>, ttl_seconds: i32) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            ttl_seconds,
        }
    }

    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("key cannot be empty".to_string());
        }
        if self.ttl_seconds < 0 {
            return Some("ttl_seconds cannot be negative".to_string());
        }
        None
    }
}

/// Request body for adding a node to the proxy (POST /nodes)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRequest {
    /// Node address, `host:port` or a full URL
    pub address: String,
}
