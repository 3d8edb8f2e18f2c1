//! API Module
//!
//! HTTP handlers and routing for the cache REST API. A thin layer: keys are
//! checked for presence, everything else is delegated to the cache service.
//!
//! # Endpoints
//! - `GET|POST|PUT|DELETE /api/cache` - Read, store, update (501), remove
//! - `GET /api/cache/values` - Mirror snapshot
//! - `POST /api/cache/reload` - Rebuild the mirror
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
