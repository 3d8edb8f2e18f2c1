//! Response DTOs for the cache HTTP API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for `GET /api/cache`
///
/// A miss carries an empty value rather than an error status.
#[derive(Debug, Clone, Serialize)]
pub struct ReadResponse {
    /// The normalized key
    pub key: String,
    /// The stored value, empty on a miss
    pub value: String,
}

impl ReadResponse {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Response body for `POST /api/cache`
#[derive(Debug, Clone, Serialize)]
pub struct AddResponse {
    /// Success message
    pub message: String,
    /// The normalized key that was written
    pub key: String,
}

impl AddResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' stored successfully", key),
            key,
        }
    }
}

/// Response body for `DELETE /api/cache`
#[derive(Debug, Clone, Serialize)]
pub struct RemoveResponse {
    pub key: String,
    /// Always true; removal of an absent key succeeds
    pub removed: bool,
}

impl RemoveResponse {
    pub fn new(key: impl Into<String>, removed: bool) -> Self {
        Self {
            key: key.into(),
            removed,
        }
    }
}

/// Response body for `GET /api/cache/values`
#[derive(Debug, Clone, Serialize)]
pub struct ValuesResponse {
    pub count: usize,
    pub values: Vec<String>,
}

impl ValuesResponse {
    pub fn new(values: Vec<String>) -> Self {
        Self {
            count: values.len(),
            values,
        }
    }
}

/// Response body for `POST /api/cache/reload`
#[derive(Debug, Clone, Serialize)]
pub struct ReloadResponse {
    /// Entries held by the mirror after the reload
    pub entries: usize,
}

/// Response body for the stats endpoint (`GET /stats`)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub mirror_hits: u64,
    pub store_hits: u64,
    pub misses: u64,
    pub merge_skips: u64,
    pub reloads: u64,
    pub mirror_entries: usize,
    /// Fraction of reads served from the mirror
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            mirror_hits: stats.mirror_hits,
            store_hits: stats.store_hits,
            misses: stats.misses,
            merge_skips: stats.merge_skips,
            reloads: stats.reloads,
            mirror_entries: stats.mirror_entries,
        }
    }
}

/// Response body for the health endpoint (`GET /health`)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Name of the backing store
    pub store: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(store: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            store: store.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
