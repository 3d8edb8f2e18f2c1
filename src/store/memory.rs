//! In-memory persistent store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::CacheEntry;
use crate::error::Result;
use crate::store::PersistentStore;

/// Process-local store keyed by normalized key.
///
/// Expired records are kept until overwritten or deleted; the live filter
/// hides them from lookups.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<String, CacheEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of physical records, expired ones included.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Raw record for `key`, ignoring expiry.
    pub async fn get_raw(&self, key: &str) -> Option<CacheEntry> {
        self.records.read().await.get(key).cloned()
    }
}

#[async_trait]
impl PersistentStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn upsert(
        &self,
        key: &str,
        value: String,
        expires_at: Option<u64>,
    ) -> Result<CacheEntry> {
        let entry = CacheEntry::new(key, value, expires_at);
        self.records
            .write()
            .await
            .insert(key.to_string(), entry.clone());
        Ok(entry)
    }

    async fn find_one(&self, key: &str, min_expires_at: u64) -> Result<Option<CacheEntry>> {
        let records = self.records.read().await;
        Ok(records
            .get(key)
            .filter(|entry| entry.is_live_at(min_expires_at))
            .cloned())
    }

    async fn find_all(&self, min_expires_at: u64) -> Result<Vec<CacheEntry>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|entry| entry.is_live_at(min_expires_at))
            .cloned()
            .collect())
    }

    async fn delete_all(&self, key: &str) -> Result<u64> {
        let removed = self.records.write().await.remove(key);
        Ok(removed.map_or(0, |_| 1))
    }
}
