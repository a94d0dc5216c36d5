//! API Module
//!
//! HTTP handlers and routing for both roles.
//!
//! # Node Endpoints
//! - `PUT /set` - Store a key-value pair
//! - `GET /get/:key` - Retrieve a value by key
//! - `DELETE /del/:key` - Delete a key
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint
//!
//! The proxy serves the same data endpoints plus `/nodes` membership admin.

pub mod handlers;
pub mod proxy;
pub mod routes;

pub use handlers::*;
pub use proxy::*;
pub use routes::{create_proxy_router, create_router};
