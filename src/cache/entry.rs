//! Cache Entry Module
//!
//! Defines the unit of storage shared by the persistent store and the mirror.

use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// A single key-value record with an optional absolute expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// Normalized key, fixed for the life of the entry
    key: String,
    /// Serialized payload
    pub value: String,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry for an already-normalized key.
    pub fn new(key: impl Into<String>, value: impl Into<String>, expires_at: Option<u64>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            expires_at,
        }
    }

    /// Returns the entry's normalized key.
    pub fn key(&self) -> &str {
        &self.key
    }

    // == Is Live ==
    /// Checks whether the entry may be served at `now_ms`.
    ///
    /// Boundary condition: an entry is still live at exactly its expiry
    /// instant and expires strictly after it.
    pub fn is_live_at(&self, now_ms: u64) -> bool {
        match self.expires_at {
            Some(expires) => now_ms <= expires,
            None => true,
        }
    }

    /// Inverse of [`CacheEntry::is_live_at`].
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        !self.is_live_at(now_ms)
    }
}

// == Expiry Computation ==
/// Computes the absolute expiry for a write at `now_ms`.
///
/// Only a positive TTL produces an expiry; zero or absent means the entry
/// never expires.
pub fn expiry_from_ttl(now_ms: u64, ttl_seconds: Option<u64>) -> Option<u64> {
    match ttl_seconds {
        Some(ttl) if ttl > 0 => Some(now_ms.saturating_add(ttl.saturating_mul(1000))),
        _ => None,
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_without_expiry_is_always_live() {
        let entry = CacheEntry::new("k", "v", None);

        assert_eq!(entry.key(), "k");
        assert!(entry.is_live_at(0));
        assert!(entry.is_live_at(u64::MAX));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new("k", "v", Some(5_000));

        assert!(entry.is_live_at(4_999));
        assert!(entry.is_live_at(5_000), "Entry is live at its expiry instant");
        assert!(entry.is_expired_at(5_001));
    }

    #[test]
    fn test_expiry_from_ttl() {
        assert_eq!(expiry_from_ttl(1_000, Some(2)), Some(3_000));
        assert_eq!(expiry_from_ttl(1_000, Some(0)), None);
        assert_eq!(expiry_from_ttl(1_000, None), None);
    }

    #[test]
    fn test_entry_serializes_camel_case() {
        let entry = CacheEntry::new("k", "\"v\"", Some(42));
        let json = serde_json::to_string(&entry).unwrap();

        assert!(json.contains("\"expiresAt\":42"));
        let back: CacheEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
