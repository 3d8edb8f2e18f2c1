//! Cache Engine Module
//!
//! Write-through cache over a [`PersistentStore`]. Writes go straight to the
//! store; reads are served from the local mirror while the mirrored entry is
//! live and fall back to the store on a miss, folding the result back into
//! the mirror.
//!
//! # Concurrency
//! The mirror and its counters sit behind one mutex. The lock is never held
//! across a store round-trip, so a read may race a write to the same key and
//! observe either the old mirrored value or the store's new one until the
//! mirrored entry expires or the mirror is reloaded. `add` never touches the
//! mirror.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::{
    expiry_from_ttl, CacheEntry, CacheStats, Clock, MergeOutcome, Mirror, SystemClock,
};
use crate::error::Result;
use crate::store::PersistentStore;

// == Lookup ==
/// Where a read was answered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Live entry already in the mirror
    Mirror(CacheEntry),
    /// Fetched from the store and merged into the mirror
    Store(CacheEntry),
    /// No live entry in mirror or store
    Miss,
    /// Found in the store but the key was removed or the mirror reloaded
    /// during the lookup; treated as a miss
    MergeSkipped,
}

impl Lookup {
    /// Payload to hand back to the caller, if any.
    pub fn into_value(self) -> Option<String> {
        match self {
            Lookup::Mirror(entry) | Lookup::Store(entry) => Some(entry.value),
            Lookup::Miss | Lookup::MergeSkipped => None,
        }
    }
}

#[derive(Debug, Default)]
struct EngineState {
    mirror: Mirror,
    stats: CacheStats,
}

impl EngineState {
    fn sync_entry_count(&mut self) {
        let len = self.mirror.len();
        self.stats.set_mirror_entries(len);
    }
}

// == Cache Engine ==
/// Mirror-first cache over a persistent store.
///
/// Keys passed to the engine must already be normalized.
pub struct CacheEngine {
    store: Arc<dyn PersistentStore>,
    clock: Arc<dyn Clock>,
    state: Mutex<EngineState>,
}

impl CacheEngine {
    // == Constructor ==
    /// Creates an engine over `store` using the system clock.
    pub fn new(store: Arc<dyn PersistentStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    /// Creates an engine with an explicit time source.
    pub fn with_clock(store: Arc<dyn PersistentStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            state: Mutex::new(EngineState::default()),
        }
    }

    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    // == Add ==
    /// Upserts `payload` under `key` in the store.
    ///
    /// A positive `ttl_seconds` sets the expiry relative to now; otherwise the
    /// entry never expires. The mirror is left untouched and catches up on a
    /// later read or reload.
    pub async fn add(
        &self,
        key: &str,
        payload: String,
        ttl_seconds: Option<u64>,
    ) -> Result<CacheEntry> {
        let expires_at = expiry_from_ttl(self.clock.now_ms(), ttl_seconds);
        let stored = self.store.upsert(key, payload, expires_at).await?;
        debug!("ADD key={} expires_at={:?}", key, expires_at);
        Ok(stored)
    }

    // == Lookup ==
    /// Resolves `key` against the mirror, then the store.
    pub async fn lookup(&self, key: &str) -> Result<Lookup> {
        let now = self.clock.now_ms();

        let ticket = {
            let mut state = self.state.lock().await;
            if let Some(entry) = state.mirror.find_live(key, now).cloned() {
                state.stats.record_mirror_hit();
                debug!("READ key={} served from mirror", key);
                return Ok(Lookup::Mirror(entry));
            }
            state.mirror.begin_fetch()
        };

        let fetched = self.store.find_one(key, now).await;

        let mut state = self.state.lock().await;
        let outcome = self.settle_fetch(&mut state, key, now, fetched, ticket);
        state.mirror.finish_fetch();
        outcome
    }

    /// Folds the result of a store lookup into the mirror. Runs under the lock.
    fn settle_fetch(
        &self,
        state: &mut EngineState,
        key: &str,
        now: u64,
        fetched: Result<Option<CacheEntry>>,
        ticket: u64,
    ) -> Result<Lookup> {
        let Some(fetched) = fetched? else {
            if state.mirror.prune_expired(key, now) {
                state.sync_entry_count();
            }
            state.stats.record_miss();
            debug!("READ key={} miss", key);
            return Ok(Lookup::Miss);
        };

        match state.mirror.merge(fetched.clone(), ticket) {
            MergeOutcome::Skipped => {
                state.stats.record_merge_skip();
                warn!("READ key={} repopulation skipped, key changed during lookup", key);
                Ok(Lookup::MergeSkipped)
            }
            outcome => {
                state.stats.record_store_hit();
                state.sync_entry_count();
                debug!("READ key={} repopulated from {} ({:?})", key, self.store.name(), outcome);
                Ok(Lookup::Store(fetched))
            }
        }
    }

    // == Read ==
    /// Returns the live payload for `key`, or None on a miss.
    pub async fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lookup(key).await?.into_value())
    }

    // == Remove ==
    /// Deletes `key` from the mirror and every matching store record.
    ///
    /// Succeeds whether or not the key existed. The mirror is invalidated
    /// again once the store delete lands so that a read racing the delete
    /// cannot leave the old value mirrored.
    pub async fn remove(&self, key: &str) -> Result<()> {
        self.invalidate(key).await;
        let deleted = self.store.delete_all(key).await?;
        self.invalidate(key).await;
        debug!("REMOVE key={} deleted {} store records", key, deleted);
        Ok(())
    }

    async fn invalidate(&self, key: &str) {
        let mut state = self.state.lock().await;
        if state.mirror.remove(key) {
            state.sync_entry_count();
        }
    }

    // == Reload ==
    /// Replaces the whole mirror with the store's currently live entries.
    ///
    /// Returns the number of entries now mirrored.
    pub async fn reload(&self) -> Result<usize> {
        let now = self.clock.now_ms();
        let entries = self.store.find_all(now).await?;

        let mut state = self.state.lock().await;
        state.mirror.replace(entries);
        state.stats.record_reload();
        state.sync_entry_count();

        let count = state.mirror.len();
        info!("Mirror reloaded from {} store: {} live entries", self.store.name(), count);
        Ok(count)
    }

    // == Snapshot ==
    /// Copy of the mirror as it stands, expired entries included.
    pub async fn snapshot(&self) -> Vec<CacheEntry> {
        self.state.lock().await.mirror.entries().to_vec()
    }

    // == Stats ==
    pub async fn stats(&self) -> CacheStats {
        let state = self.state.lock().await;
        let mut stats = state.stats.clone();
        stats.set_mirror_entries(state.mirror.len());
        stats
    }

    /// Installs `entries` as the mirror without consulting the store.
    #[cfg(test)]
    pub(crate) async fn seed_mirror(&self, entries: Vec<CacheEntry>) {
        let mut state = self.state.lock().await;
        state.mirror.replace(entries);
        state.sync_entry_count();
    }
}
