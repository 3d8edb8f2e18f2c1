//! Cache Module
//!
//! Write-through cache engine with a lazily-checked TTL and an in-process
//! mirror of the persistent store.

mod clock;
mod engine;
mod entry;
mod key;
mod mirror;
mod stats;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{CacheEngine, Lookup};
pub use entry::{expiry_from_ttl, CacheEntry};
pub use key::format_entry_key;
pub use mirror::{MergeOutcome, Mirror};
pub use stats::CacheStats;
