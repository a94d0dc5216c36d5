//! API Routes
//!
//! Configures the Axum routers for the node and proxy roles.

use axum::{
    routing::{delete, get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_handler, get_handler, health_handler, set_handler, stats_handler, AppState,
};
use super::proxy::{
    add_node_handler, list_nodes_handler, proxy_delete_handler, proxy_get_handler,
    proxy_health_handler, proxy_set_handler, remove_node_handler, ProxyState,
};

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Creates the node router.
///
/// # Endpoints
/// - `PUT /set` - Store a key-value pair
/// - `GET /get/:key` - Retrieve a value by key
/// - `DELETE /del/:key` - Delete a key
/// - `GET /stats` - Get cache statistics
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/set", put(set_handler))
        .route("/get/:key", get(get_handler))
        .route("/del/:key", delete(delete_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Creates the proxy router.
///
/// Same data endpoints as a node, routed by key, plus:
/// - `GET /nodes` - List ring members
/// - `POST /nodes` - Add a node
/// - `DELETE /nodes/:address` - Remove a node
pub fn create_proxy_router(state: ProxyState) -> Router {
    Router::new()
        .route("/set", put(proxy_set_handler))
        .route("/get/:key", get(proxy_get_handler))
        .route("/del/:key", delete(proxy_delete_handler))
        .route("/health", get(proxy_health_handler))
        .route("/nodes", get(list_nodes_handler).post(add_node_handler))
        .route("/nodes/:address", delete(remove_node_handler))
        .layer(cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
