//! Local Mirror Module
//!
//! The in-process copy of a subset of store entries. Holds at most one entry
//! per key and may retain entries past their expiry until they are next
//! accessed, removed, or replaced by a reload.

use std::collections::HashMap;

use crate::cache::CacheEntry;

// == Merge Outcome ==
/// Result of folding a store entry back into the mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// No entry existed for the key; one was added
    Inserted,
    /// An entry for the key was overwritten in place
    Updated,
    /// The key was removed, or the mirror replaced, after the store lookup
    /// began, so the fetched entry may already be obsolete and was dropped
    Skipped,
}

// == Mirror ==
/// Ordered collection of mirrored entries plus conflict bookkeeping.
///
/// Every removal and full replacement advances `generation`. Readers take a
/// ticket from [`Mirror::begin_fetch`] before going to the store; the merge
/// is refused if the mirror was replaced since, or if the same key was
/// removed since. Removals of other keys do not interfere.
#[derive(Debug, Default)]
pub struct Mirror {
    entries: Vec<CacheEntry>,
    generation: u64,
    replaced_at: u64,
    /// Generation of the latest removal per key, kept only while fetches are
    /// in flight
    removed_at: HashMap<String, u64>,
    in_flight: usize,
}

impl Mirror {
    pub fn new() -> Self {
        Self::default()
    }

    // == Lookup ==
    /// Returns the entry for `key` if present and live at `now_ms`.
    pub fn find_live(&self, key: &str, now_ms: u64) -> Option<&CacheEntry> {
        self.entries
            .iter()
            .find(|entry| entry.key() == key && entry.is_live_at(now_ms))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    // == Fetch Tracking ==
    /// Registers a store lookup and returns the generation it must be merged
    /// against. Pair with [`Mirror::finish_fetch`].
    pub fn begin_fetch(&mut self) -> u64 {
        self.in_flight += 1;
        self.generation
    }

    /// Ends a store lookup. Once none are outstanding the removal records
    /// can no longer matter and are dropped.
    pub fn finish_fetch(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.in_flight == 0 {
            self.removed_at.clear();
        }
    }

    // == Merge ==
    /// Folds an entry fetched from the store into the mirror.
    ///
    /// `seen_generation` is the ticket taken before the store lookup. The
    /// merge is skipped if the mirror was replaced or this key was removed
    /// after it was taken.
    pub fn merge(&mut self, fetched: CacheEntry, seen_generation: u64) -> MergeOutcome {
        let removed_since = self
            .removed_at
            .get(fetched.key())
            .is_some_and(|&at| at > seen_generation);
        if self.replaced_at > seen_generation || removed_since {
            return MergeOutcome::Skipped;
        }

        match self.position(fetched.key()) {
            Some(idx) => {
                let existing = &mut self.entries[idx];
                existing.value = fetched.value;
                existing.expires_at = fetched.expires_at;
                MergeOutcome::Updated
            }
            None => {
                self.entries.push(fetched);
                MergeOutcome::Inserted
            }
        }
    }

    // == Remove ==
    /// Drops the entry for `key`, if any, and refuses in-flight merges for
    /// that key.
    pub fn remove(&mut self, key: &str) -> bool {
        self.generation += 1;
        if self.in_flight > 0 {
            self.removed_at.insert(key.to_string(), self.generation);
        }
        match self.position(key) {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Drops the entry for `key` only if it has expired at `now_ms`.
    ///
    /// Not a conflict: a later live value for the key is still welcome.
    pub fn prune_expired(&mut self, key: &str, now_ms: u64) -> bool {
        match self.position(key) {
            Some(idx) if self.entries[idx].is_expired_at(now_ms) => {
                self.entries.remove(idx);
                true
            }
            _ => false,
        }
    }

    // == Replace ==
    /// Swaps in a complete new set of entries and refuses every in-flight
    /// merge.
    ///
    /// Later duplicates of a key win, so the one-entry-per-key rule holds
    /// even if the source yields more than one record for a key.
    pub fn replace(&mut self, entries: Vec<CacheEntry>) {
        let mut index: HashMap<String, usize> = HashMap::with_capacity(entries.len());
        let mut fresh: Vec<CacheEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            match index.get(entry.key()) {
                Some(&idx) => fresh[idx] = entry,
                None => {
                    index.insert(entry.key().to_string(), fresh.len());
                    fresh.push(entry);
                }
            }
        }
        self.entries = fresh;
        self.generation += 1;
        self.replaced_at = self.generation;
        self.removed_at.clear();
    }

// == Snapshot ==
    /// Raw mirror contents in insertion order, expired entries included.
    pub fn entries(&self) -> &[CacheEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.key() == key)
    }
}
