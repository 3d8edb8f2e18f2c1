//! JSON-file persistent store.
//!
//! Records are held in memory and the whole set is rewritten to disk after
//! every mutation (write to a sibling temp file, then rename).

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::cache::CacheEntry;
use crate::error::{CacheError, Result};
use crate::store::PersistentStore;

/// Durable store backed by a single JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    records: Mutex<BTreeMap<String, CacheEntry>>,
}

impl FileStore {
    /// Opens the store at `path`, loading existing records if the file exists.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => {
                let entries: Vec<CacheEntry> = serde_json::from_slice(&bytes).map_err(|e| {
                    CacheError::Store(format!("corrupt store file {}: {}", path.display(), e))
                })?;
                entries
                    .into_iter()
                    .map(|entry| (entry.key().to_string(), entry))
                    .collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        info!("Opened file store at {} with {} records", path.display(), records.len());

        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    async fn flush(&self, records: &BTreeMap<String, CacheEntry>) -> Result<()> {
        let entries: Vec<&CacheEntry> = records.values().collect();
        let bytes = serde_json::to_vec_pretty(&entries)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, bytes).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        debug!("Flushed {} records to {}", entries.len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl PersistentStore for FileStore {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn upsert(
        &self,
        key: &str,
        value: String,
        expires_at: Option<u64>,
    ) -> Result<CacheEntry> {
        let entry = CacheEntry::new(key, value, expires_at);
        let mut records = self.records.lock().await;
        let previous = records.insert(key.to_string(), entry.clone());

        if let Err(e) = self.flush(&records).await {
            // Keep memory and disk in agreement
            match previous {
                Some(old) => records.insert(key.to_string(), old),
                None => records.remove(key),
            };
            return Err(e);
        }
        Ok(entry)
    }

    async fn find_one(&self, key: &str, min_expires_at: u64) -> Result<Option<CacheEntry>> {
        let records = self.records.lock().await;
        Ok(records
            .get(key)
            .filter(|entry| entry.is_live_at(min_expires_at))
            .cloned())
    }

    async fn find_all(&self, min_expires_at: u64) -> Result<Vec<CacheEntry>> {
        let records = self.records.lock().await;
        Ok(records
            .values()
            .filter(|entry| entry.is_live_at(min_expires_at))
            .cloned()
            .collect())
    }

    async fn delete_all(&self, key: &str) -> Result<u64> {
        let mut records = self.records.lock().await;
        let Some(old) = records.remove(key) else {
            return Ok(0);
        };

        if let Err(e) = self.flush(&records).await {
            records.insert(key.to_string(), old);
            return Err(e);
        }
        Ok(1)
    }
}
