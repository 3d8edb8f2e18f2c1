//! Persistent Store Module
//!
//! Contract for the durable key-value store the cache writes through to, and
//! the implementations shipped with the crate.
//!
//! # Implementations
//! - [`MemoryStore`] - process-local, for tests and ephemeral runs
//! - [`FileStore`] - JSON file on disk, survives restarts

mod file;
mod memory;

use async_trait::async_trait;

use crate::cache::CacheEntry;
use crate::error::Result;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Durable key-value storage addressed by normalized key.
///
/// "Live" filters (`min_expires_at`) match entries that never expire or whose
/// expiry is at or after the given Unix-millisecond instant.
#[async_trait]
pub trait PersistentStore: Send + Sync {
    /// A name for logging.
    fn name(&self) -> &'static str;

    /// Inserts or replaces the entry for `key` in a single atomic step and
    /// returns the stored entry.
    async fn upsert(&self, key: &str, value: String, expires_at: Option<u64>)
        -> Result<CacheEntry>;

    /// Returns the live entry for `key`, if any.
    async fn find_one(&self, key: &str, min_expires_at: u64) -> Result<Option<CacheEntry>>;

    /// Returns every live entry.
    async fn find_all(&self, min_expires_at: u64) -> Result<Vec<CacheEntry>>;

    /// Deletes every record for `key` and returns how many were removed.
    async fn delete_all(&self, key: &str) -> Result<u64>;
}
