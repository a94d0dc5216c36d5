//! Error types for the cache node and routing proxy
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for nodes and the router.
///
/// Routing failures, transport failures and logical misses are separate
/// variants so callers can pick a recovery strategy per kind.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found (absent or expired)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The owning node refused the write
    #[error("Rejected by node: {0}")]
    Rejected(String),

    /// The ring has no nodes to route to
    #[error("No cache nodes available")]
    NoNodesAvailable,

    /// Connection or remote call failed at the transport level
    #[error("Transport error talking to {node}: {message}")]
    Transport { node: String, message: String },

    /// Remote call exceeded its deadline
    #[error("Request to {node} timed out")]
    Timeout { node: String },

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// Builds a transport error for `node`.
    pub fn transport(node: impl Into<String>, message: impl ToString) -> Self {
        CacheError::Transport {
            node: node.into(),
            message: message.to_string(),
        }
    }

    /// True for failures where retrying later may help.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            CacheError::Transport { .. } | CacheError::Timeout { .. }
        )
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Rejected(_) => StatusCode::BAD_REQUEST,
            CacheError::NoNodesAvailable => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Transport { .. } => StatusCode::BAD_GATEWAY,
            CacheError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the crate.
pub type Result<T> = std::result::Result<T, CacheError>;
