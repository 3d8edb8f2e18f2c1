//! API Handlers
//!
//! HTTP request handlers for each cache endpoint. Validation is limited to
//! rejecting blank keys; all cache semantics live in [`KeyValueCache`].

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use tracing::info;

use crate::cache::format_entry_key;
use crate::error::{CacheError, Result};
use crate::models::{
    AddRequest, AddResponse, HealthResponse, KeyQuery, ReadResponse, ReloadResponse,
    RemoveResponse, StatsResponse, ValuesResponse,
};
use crate::service::KeyValueCache;
use crate::store::PersistentStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Text-valued cache service
    pub cache: KeyValueCache<String>,
}

impl AppState {
    pub fn new(cache: KeyValueCache<String>) -> Self {
        Self { cache }
    }

    /// Builds the cache service over `store` with the system clock.
    pub fn from_store(store: Arc<dyn PersistentStore>) -> Self {
        Self::new(KeyValueCache::with_store(store))
    }

    /// Loads the mirror from the store once, before traffic is served.
    pub async fn warm_up(&self) -> Result<usize> {
        let count = self.cache.reload().await?;
        info!("Cache warmed with {} entries", count);
        Ok(count)
    }
}

/// Handler for `GET /api/cache?key=...`
///
/// A miss answers 200 with an empty value.
pub async fn read_handler(
    State(state): State<AppState>,
    Query(query): Query<KeyQuery>,
) -> Result<Json<ReadResponse>> {
    let key = query.require_key().map_err(CacheError::InvalidRequest)?;
    let value = state.cache.read(key).await?;

    Ok(Json(ReadResponse::new(format_entry_key(key), value)))
}

/// Handler for `POST /api/cache`
pub async fn add_handler(
    State(state): State<AppState>,
    Json(req): Json<AddRequest>,
) -> Result<Json<AddResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    state
        .cache
        .add(&req.key, &req.value, req.ttl_seconds())
        .await?;

    Ok(Json(AddResponse::new(format_entry_key(&req.key))))
}

/// Handler for `PUT /api/cache`
///
/// Always fails with 501: in-place update is not provided.
pub async fn update_handler(
    State(state): State<AppState>,
    Json(req): Json<AddRequest>,
) -> Result<Json<AddResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    state.cache.update(&req.key, req.value)?;
    Ok(Json(AddResponse::new(format_entry_key(&req.key))))
}

/// Handler for `DELETE /api/cache?key=...`
pub async fn remove_handler(
    State(state): State<AppState>,
    Query(query): Query<KeyQuery>,
) -> Result<Json<RemoveResponse>> {
    let key = query.require_key().map_err(CacheError::InvalidRequest)?;
    let removed = state.cache.remove(key).await?;

    Ok(Json(RemoveResponse::new(format_entry_key(key), removed)))
}

/// Handler for `GET /api/cache/values`
pub async fn values_handler(State(state): State<AppState>) -> Json<ValuesResponse> {
    Json(ValuesResponse::new(state.cache.read_values().await))
}

/// Handler for `POST /api/cache/reload`
pub async fn reload_handler(State(state): State<AppState>) -> Result<Json<ReloadResponse>> {
    let entries = state.cache.reload().await?;
    Ok(Json(ReloadResponse { entries }))
}

/// Handler for `GET /stats`
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats().await))
}

/// Handler for `GET /health`
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.cache.engine().store_name()))
}
