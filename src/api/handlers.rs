//! Node API Handlers
//!
//! HTTP request handlers exposing one node's cache service.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::models::{
    DeleteResponse, GetResponse, HealthResponse, SetRequest, SetResponse, StatsResponse,
};
use crate::service::CacheService;

/// Application state shared across all node handlers.
pub type AppState = CacheService;

/// Handler for PUT /set
///
/// A refused write is a 400 carrying `success: false`, not an error body.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> (StatusCode, Json<SetResponse>) {
    let resp = state.set(req);
    let status = if resp.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };

    (status, Json(resp))
}

/// Handler for GET /get/:key
///
/// Misses are 404 with `found: false`.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> (StatusCode, Json<GetResponse>) {
    let resp = state.get(&key);
    let status = if resp.found {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };

    (status, Json(resp))
}

/// Handler for DELETE /del/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    Json(state.delete(&key))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.stats())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn state() -> AppState {
        CacheService::new(Default::default(), Duration::from_secs(300))
    }

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let state = state();

        let req = SetRequest::new("test_key", "test_value", 0);
        let (status, Json(resp)) = set_handler(State(state.clone()), Json(req)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(resp.success);

        let (status, Json(resp)) =
            get_handler(State(state.clone()), Path("test_key".to_string())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resp.value, b"test_value");
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let (status, Json(resp)) =
            get_handler(State(state()), Path("nonexistent".to_string())).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(!resp.found);
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let state = state();

        set_handler(State(state.clone()), Json(SetRequest::new("to_delete", "v", 0))).await;

        let Json(resp) = delete_handler(State(state.clone()), Path("to_delete".to_string())).await;
        assert!(resp.success);

        let (status, _) = get_handler(State(state), Path("to_delete".to_string())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_missing_succeeds() {
        let Json(resp) = delete_handler(State(state()), Path("ghost".to_string())).await;
        assert!(resp.success);
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let response = stats_handler(State(state())).await;
        assert_eq!(response.hits, 0);
        assert_eq!(response.misses, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[tokio::test]
    async fn test_set_empty_key() {
        let state = state();

        let (status, Json(resp)) =
            set_handler(State(state.clone()), Json(SetRequest::new("", "value", 0))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!resp.success);
        assert!(state.store.is_empty());
    }
}
