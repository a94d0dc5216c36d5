//! Proxy API Handlers
//!
//! The node API shape served through the [`Router`], plus membership admin.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, GetResponse, HealthResponse, NodeRequest, NodesResponse, SetRequest,
    SetResponse,
};
use crate::router::Router;

/// State shared across proxy handlers.
#[derive(Clone)]
pub struct ProxyState {
    pub router: Arc<Router>,
}

impl ProxyState {
    pub fn new(router: Router) -> Self {
        Self {
            router: Arc::new(router),
        }
    }
}

/// Handler for PUT /set
///
/// Validation failures and writes the node refused answer 400 with the
/// same `{success, message}` body a node returns.
pub async fn proxy_set_handler(
    State(state): State<ProxyState>,
    Json(req): Json<SetRequest>,
) -> Result<(StatusCode, Json<SetResponse>)> {
    if let Some(reason) = req.validate() {
        return Ok((StatusCode::BAD_REQUEST, Json(SetResponse::rejected(reason))));
    }

    let ttl = Duration::from_secs(req.ttl_seconds.unsigned_abs().into());
    match state.router.set(&req.key, req.value, ttl).await {
        Ok(()) => Ok((StatusCode::OK, Json(SetResponse::stored()))),
        Err(CacheError::Rejected(message)) => {
            Ok((StatusCode::BAD_REQUEST, Json(SetResponse::rejected(message))))
        }
        Err(e) => Err(e),
    }
}

/// Handler for GET /get/:key
pub async fn proxy_get_handler(
    State(state): State<ProxyState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let value = state.router.get(&key).await?;
    Ok(Json(GetResponse::found(value.to_vec())))
}

/// Handler for DELETE /del/:key
pub async fn proxy_delete_handler(
    State(state): State<ProxyState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let success = state.router.delete(&key).await?;
    Ok(Json(DeleteResponse { success }))
}

/// Handler for GET /health
pub async fn proxy_health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /nodes
pub async fn list_nodes_handler(State(state): State<ProxyState>) -> Json<NodesResponse> {
    Json(NodesResponse {
        nodes: state.router.nodes(),
    })
}

/// Handler for POST /nodes
pub async fn add_node_handler(
    State(state): State<ProxyState>,
    Json(req): Json<NodeRequest>,
) -> Result<Json<NodesResponse>> {
    let address = req.address.trim();
    if address.is_empty() {
        return Err(CacheError::InvalidRequest(
            "address cannot be empty".to_string(),
        ));
    }

    state.router.add_node(address);
    Ok(Json(NodesResponse {
        nodes: state.router.nodes(),
    }))
}

/// Handler for DELETE /nodes/:address
pub async fn remove_node_handler(
    State(state): State<ProxyState>,
    Path(address): Path<String>,
) -> Json<NodesResponse> {
    state.router.remove_node(&address);
    Json(NodesResponse {
        nodes: state.router.nodes(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::LocalConnector;

    fn state(nodes: &[&str]) -> ProxyState {
        let connector = LocalConnector::default();
        ProxyState::new(Router::new(nodes, 10, Arc::new(connector)))
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let state = state(&["a:1", "b:2"]);

        let req = SetRequest::new("user:1", "alice", 60);
        proxy_set_handler(State(state.clone()), Json(req)).await.unwrap();

        let Json(resp) = proxy_get_handler(State(state), Path("user:1".to_string()))
            .await
            .unwrap();
        assert_eq!(resp, GetResponse::found(b"alice".to_vec()));
    }

    #[tokio::test]
    async fn test_empty_key_answers_like_a_node() {
        let state = state(&["a:1"]);

        let (status, Json(resp)) =
            proxy_set_handler(State(state), Json(SetRequest::new("", "v", 60)))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!resp.success);
        assert_eq!(resp.message, "key cannot be empty");
    }

    #[tokio::test]
    async fn test_negative_ttl_rejected() {
        let state = state(&["a:1"]);

        let (status, Json(resp)) =
            proxy_set_handler(State(state), Json(SetRequest::new("k", "v", -5)))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!resp.success);
    }

    #[tokio::test]
    async fn test_get_miss_is_not_found() {
        let state = state(&["a:1"]);

        let err = proxy_get_handler(State(state), Path("nope".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, CacheError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_no_nodes() {
        let state = state(&[]);

        let err = proxy_set_handler(State(state), Json(SetRequest::new("k", "v", 0)))
            .await
            .unwrap_err();
        assert!(matches!(err, CacheError::NoNodesAvailable));
    }

    #[tokio::test]
    async fn test_membership_admin() {
        let state = state(&["a:1"]);

        let Json(resp) = add_node_handler(
            State(state.clone()),
            Json(NodeRequest {
                address: "b:2".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(resp.nodes, vec!["a:1", "b:2"]);

        let Json(resp) = remove_node_handler(State(state.clone()), Path("a:1".to_string())).await;
        assert_eq!(resp.nodes, vec!["b:2"]);

        let Json(resp) = list_nodes_handler(State(state)).await;
        assert_eq!(resp.nodes, vec!["b:2"]);
    }

    #[tokio::test]
    async fn test_add_blank_node_rejected() {
        let state = state(&[]);

        let result = add_node_handler(
            State(state),
            Json(NodeRequest {
                address: "  ".to_string(),
            }),
        )
        .await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }
}
