//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Which half of the system this process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// A cache node holding a local TTL store
    Node,
    /// The routing proxy sharding keys across nodes
    Proxy,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "node" => Ok(Role::Node),
            "proxy" | "router" => Ok(Role::Proxy),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Node or proxy
    pub role: Role,
    /// HTTP server port
    pub server_port: u16,
    /// TTL in seconds substituted when a Set carries none
    pub default_ttl: u64,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Initial node addresses (proxy role)
    pub nodes: Vec<String>,
    /// Virtual points per node on the hash ring
    pub replicas: usize,
    /// Deadline for a single remote call, in milliseconds
    pub request_timeout_ms: u64,
    /// Deadline for establishing a connection, in milliseconds
    pub connect_timeout_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `ROLE` - `node` or `proxy` (default: node)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 86400)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 5)
    /// - `NODES` - Comma-separated node addresses (default: none)
    /// - `REPLICAS` - Virtual points per node (default: 100)
    /// - `REQUEST_TIMEOUT_MS` - Remote call timeout (default: 5000)
    /// - `CONNECT_TIMEOUT_MS` - Connect timeout (default: 2000)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            role: parse_var("ROLE").unwrap_or(defaults.role),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            default_ttl: parse_var("DEFAULT_TTL").unwrap_or(defaults.default_ttl),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            nodes: env::var("NODES")
                .map(|v| parse_node_list(&v))
                .unwrap_or(defaults.nodes),
            replicas: parse_var("REPLICAS").unwrap_or(defaults.replicas),
            request_timeout_ms: parse_var("REQUEST_TIMEOUT_MS")
                .unwrap_or(defaults.request_timeout_ms),
            connect_timeout_ms: parse_var("CONNECT_TIMEOUT_MS")
                .unwrap_or(defaults.connect_timeout_ms),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            role: Role::Node,
            server_port: 3000,
            default_ttl: 86_400,
            cleanup_interval: 5,
            nodes: Vec::new(),
            replicas: 100,
            request_timeout_ms: 5_000,
            connect_timeout_ms: 2_000,
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Splits a comma-separated address list, dropping blanks.
pub fn parse_node_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
