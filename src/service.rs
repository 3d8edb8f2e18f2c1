//! Key-Value Cache Service
//!
//! Typed facade over [`CacheEngine`]. Normalizes keys and converts values to
//! and from their JSON payload form; everything else is passed through.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::cache::{format_entry_key, CacheEngine, CacheStats};
use crate::error::{CacheError, Result};
use crate::store::PersistentStore;

// == Key Value Cache ==
/// Typed cache API. A miss reads as `T::default()`.
pub struct KeyValueCache<T> {
    engine: Arc<CacheEngine>,
    _value: PhantomData<fn() -> T>,
}

impl<T> Clone for KeyValueCache<T> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            _value: PhantomData,
        }
    }
}

impl<T> KeyValueCache<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Wraps an existing engine.
    pub fn new(engine: Arc<CacheEngine>) -> Self {
        Self {
            engine,
            _value: PhantomData,
        }
    }

    /// Builds an engine over `store` with the system clock.
    pub fn with_store(store: Arc<dyn PersistentStore>) -> Self {
        Self::new(Arc::new(CacheEngine::new(store)))
    }

    pub fn engine(&self) -> &Arc<CacheEngine> {
        &self.engine
    }

    /// Normalizes a caller-supplied key.
    pub fn format_entry_key(&self, key: &str) -> String {
        format_entry_key(key)
    }

    // == Add ==
    /// Stores `value` under `key`, expiring after `ttl_seconds` when positive.
    pub async fn add(&self, key: &str, value: &T, ttl_seconds: Option<u64>) -> Result<()> {
        let payload = serde_json::to_string(value)?;
        self.engine
            .add(&format_entry_key(key), payload, ttl_seconds)
            .await?;
        Ok(())
    }

    // == Read ==
    /// Returns the live value for `key`, or `T::default()` on a miss.
    pub async fn read(&self, key: &str) -> Result<T> {
        match self.engine.read(&format_entry_key(key)).await? {
            Some(payload) => Ok(serde_json::from_str(&payload)?),
            None => Ok(T::default()),
        }
    }

    // == Remove ==
    /// Removes `key` everywhere. Always reports success.
    pub async fn remove(&self, key: &str) -> Result<bool> {
        self.engine.remove(&format_entry_key(key)).await?;
        Ok(true)
    }

    // == Read Values ==
    /// Values currently held in the mirror, in mirror order.
    ///
    /// Neither consults the store nor filters out expired entries, so this
    /// is a snapshot for inspection rather than a source of live values.
    /// Payloads that do not decode as `T` are skipped.
    pub async fn read_values(&self) -> Vec<T> {
        self.engine
            .snapshot()
            .await
            .into_iter()
            .filter_map(|entry| match serde_json::from_str(&entry.value) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!("Skipping undecodable mirror value for key={}: {}", entry.key(), e);
                    None
                }
            })
            .collect()
    }

    // == Reload ==
    /// Rebuilds the mirror from the store's live entries.
    pub async fn reload(&self) -> Result<usize> {
        self.engine.reload().await
    }

    // == Update ==
    /// Not provided: in-place update without touching the expiry has no
    /// implementation. Use [`KeyValueCache::add`] to overwrite.
    pub fn update(&self, key: &str, _value: T) -> Result<()> {
        Err(CacheError::Unsupported(format!(
            "update of key '{}'",
            format_entry_key(key)
        )))
    }

    pub async fn stats(&self) -> CacheStats {
        self.engine.stats().await
    }
}
