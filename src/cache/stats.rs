//! Cache Statistics Module
//!
//! Tracks where reads were served from and how often the mirror was rebuilt.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Reads served from a live mirror entry
    pub mirror_hits: u64,
    /// Reads that missed the mirror and were repopulated from the store
    pub store_hits: u64,
    /// Reads that found no live entry in mirror or store
    pub misses: u64,
    /// Repopulations dropped because the mirror changed underneath them
    pub merge_skips: u64,
    /// Completed full reloads
    pub reloads: u64,
    /// Current number of entries in the mirror
    pub mirror_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Fraction of reads answered without a store round-trip.
    ///
    /// Skipped repopulations are tracked apart and left out of the total.
    /// Returns 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.mirror_hits + self.store_hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.mirror_hits as f64 / total as f64
        }
    }

    pub fn record_mirror_hit(&mut self) {
        self.mirror_hits += 1;
    }

    pub fn record_store_hit(&mut self) {
        self.store_hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_merge_skip(&mut self) {
        self.merge_skips += 1;
    }

    pub fn record_reload(&mut self) {
        self.reloads += 1;
    }

    // == Update Entry Count ==
    pub fn set_mirror_entries(&mut self, count: usize) {
        self.mirror_entries = count;
    }
}
